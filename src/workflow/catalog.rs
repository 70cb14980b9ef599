/// Built-in component types and workflow templates
///
/// One canonical catalog. The tier tag groups entries for the UI; capability
/// flags live only here so the builder, simulator and templates cannot drift.

use crate::workflow::registry::{ComponentTier, ComponentType, ConfigOption};
use crate::workflow::template::{TemplateDefinition, TemplateEdge, TemplateSlot};
use serde_json::{json, Value};

/// Assets accepted by the trading backend and offered in asset selectors
pub const SUPPORTED_ASSETS: &[&str] = &[
    "BTC", "ETH", "SOL", "AVAX", "MATIC", "LINK", "UNI", "AAVE", "SUSHI", "CRV",
];

pub fn builtin_component_types() -> Vec<ComponentType> {
    let mut types = core_component_types();
    types.extend(hyperliquid_component_types());
    types
}

fn core_component_types() -> Vec<ComponentType> {
    use ComponentTier::Core;

    vec![
        ComponentType::new("place-order", "Place Order", "Trading", Core)
            .describe("Execute buy/sell orders on Hyperliquid")
            .emits()
            .accepts()
            .option("asset", ConfigOption::select("ETH", SUPPORTED_ASSETS))
            .option("orderType", ConfigOption::select("market", &["market", "limit"]))
            .option("side", ConfigOption::select("buy", &["buy", "sell"]))
            .option("amount", ConfigOption::number(1.0).between(0.0, 1_000_000.0))
            .option("requireConfirmation", ConfigOption::boolean(false)),
        ComponentType::new("market-data", "Market Data", "Data", Core)
            .describe("Fetch real-time prices and market info")
            .trigger()
            .option("assets", ConfigOption::string("ETH,BTC"))
            .option("refreshInterval", ConfigOption::number(5.0).between(1.0, 3600.0))
            .option("showChart", ConfigOption::boolean(false)),
        ComponentType::new("user-balance", "User Balance", "Account", Core)
            .describe("Get account balances and positions"),
        ComponentType::new("vault-manager", "Vault Manager", "Vaults", Core)
            .describe("Deposit/withdraw from Hyperliquid vaults")
            .emits()
            .accepts()
            .option("action", ConfigOption::select("deposit", &["deposit", "withdraw"]))
            .option("amount", ConfigOption::number(100.0).between(0.0, 1_000_000.0)),
        ComponentType::new("contract-call", "Contract Call", "Contracts", Core)
            .describe("Interact with HyperEVM smart contracts")
            .accepts()
            .option("contractAddress", ConfigOption::string(""))
            .option("functionName", ConfigOption::string("")),
        ComponentType::new("price-alert", "Price Alert", "Automation", Core)
            .describe("Trigger actions when price conditions are met")
            .trigger()
            .option("asset", ConfigOption::select("ETH", SUPPORTED_ASSETS))
            .option("condition", ConfigOption::select("above", &["above", "below"]))
            .option("target", ConfigOption::number(3000.0)),
        ComponentType::new("scheduler", "Scheduler", "Automation", Core)
            .describe("Execute actions on a time schedule")
            .trigger()
            .option("interval", ConfigOption::select("1h", &["5m", "15m", "1h", "4h", "1d"])),
        ComponentType::new("discord-webhook", "Discord Webhook", "Notifications", Core)
            .describe("Send notifications to Discord channels")
            .accepts()
            .option("webhookUrl", ConfigOption::string(""))
            .option("mentionRole", ConfigOption::string("")),
    ]
}

fn hyperliquid_component_types() -> Vec<ComponentType> {
    use ComponentTier::Hyperliquid;

    vec![
        ComponentType::new("hl-spot-trader", "Hyperliquid Spot Trader", "Trading", Hyperliquid)
            .describe("Execute spot trades on Hyperliquid with advanced order types")
            .ports(
                &["asset", "quantity", "orderType", "price", "timeInForce"],
                &["orderStatus", "fillPrice", "fees", "slippage", "executionTime"],
            )
            .option(
                "orderType",
                ConfigOption::select("limit", &["market", "limit", "stop", "stop_limit"]),
            )
            .option("slippageTolerance", ConfigOption::range(0.5, 0.1, 5.0))
            .option("maxRetries", ConfigOption::number(3.0).between(1.0, 10.0))
            .option("autoCancel", ConfigOption::boolean(true)),
        ComponentType::new("hl-perp-trader", "Hyperliquid Perpetuals Trader", "Trading", Hyperliquid)
            .describe("Trade perpetual futures with leverage")
            .ports(
                &["asset", "size", "leverage", "orderType", "reduceOnly"],
                &["position", "pnl", "margin", "liquidationPrice"],
            )
            .option("leverage", ConfigOption::select("5x", &["1x", "2x", "5x", "10x", "20x"])),
        ComponentType::new("hl-grid-bot", "Hyperliquid Grid Trading Bot", "Trading", Hyperliquid)
            .describe("Place buy and sell orders at regular price intervals")
            .ports(
                &["asset", "gridLevels", "priceRange", "capital", "leverage"],
                &["activeOrders", "profit", "gridStatus"],
            )
            .option("gridLevels", ConfigOption::number(10.0).between(2.0, 100.0))
            .option("priceRange", ConfigOption::string("5%")),
        ComponentType::new("hl-vault-manager", "Hyperliquid Vault Manager", "DeFi", Hyperliquid)
            .describe("Create and manage Hyperliquid vaults")
            .ports(
                &["strategy", "maxDrawdown", "feeStructure", "minDeposit"],
                &["vaultAddress", "performance", "deposits", "withdrawals"],
            )
            .option("feeStructure", ConfigOption::string("2/20"))
            .option("minDeposit", ConfigOption::number(100.0)),
        ComponentType::new("hl-liquidity-provider", "HLP Liquidity Provider", "DeFi", Hyperliquid)
            .describe("Provide liquidity to the HLP vault")
            .ports(&["amount", "duration", "autoCompound"], &["hlpTokens", "rewards", "apr"])
            .option("autoCompound", ConfigOption::boolean(true)),
        ComponentType::new("hl-yield-farmer", "Hyperliquid Yield Farmer", "DeFi", Hyperliquid)
            .describe("Rotate capital between yield strategies")
            .ports(
                &["strategies", "riskTolerance", "rebalanceFrequency"],
                &["totalYield", "allocations", "performance"],
            ),
        ComponentType::new("hl-market-data", "Hyperliquid Market Data", "Analytics", Hyperliquid)
            .describe("Stream prices, volume, order book and funding")
            .ports(
                &["assets", "timeframe", "indicators"],
                &["prices", "volume", "orderbook", "funding"],
            ),
        ComponentType::new("hl-portfolio-tracker", "Hyperliquid Portfolio Tracker", "Analytics", Hyperliquid)
            .describe("Track portfolio value and performance")
            .ports(
                &["walletAddress", "timeRange"],
                &["totalValue", "pnl", "allocations", "performance"],
            ),
        ComponentType::new("hl-risk-monitor", "Hyperliquid Risk Monitor", "Risk Management", Hyperliquid)
            .describe("Watch positions against risk limits")
            .ports(
                &["positions", "riskLimits", "alertThresholds"],
                &["riskMetrics", "alerts", "recommendations"],
            )
            .option("maxDrawdown", ConfigOption::string("10%")),
        ComponentType::new(
            "hl-trading-contract",
            "Hyperliquid Trading Smart Contract",
            "Smart Contracts",
            Hyperliquid,
        )
        .describe("Deploy trading logic to HyperEVM")
        .ports(
            &["tradingLogic", "riskParameters", "permissions"],
            &["contractAddress", "gasUsed", "executionStatus"],
        ),
        ComponentType::new("hl-oracle-contract", "Hyperliquid Price Oracle", "Smart Contracts", Hyperliquid)
            .describe("Publish price feeds on HyperEVM")
            .ports(&["assets", "updateFrequency"], &["prices", "timestamps", "confidence"]),
        ComponentType::new("hl-webhook-handler", "Hyperliquid Webhook Handler", "Infrastructure", Hyperliquid)
            .describe("Process Hyperliquid events and forward them to endpoints")
            .ports(
                &["events", "filters", "endpoints"],
                &["processedEvents", "responses", "errors"],
            )
            .option("maxConcurrency", ConfigOption::number(10.0).between(1.0, 100.0))
            .option("retryAttempts", ConfigOption::number(3.0).between(1.0, 10.0))
            .option("timeoutMs", ConfigOption::number(5000.0).between(1000.0, 30000.0)),
        ComponentType::new("hl-api-connector", "Hyperliquid API Connector", "Infrastructure", Hyperliquid)
            .describe("Managed connection to the Hyperliquid API")
            .ports(
                &["apiKey", "endpoints", "rateLimit"],
                &["responses", "errors", "connectionStatus"],
            )
            .option("rateLimit", ConfigOption::number(100.0).between(10.0, 1000.0))
            .option("reconnectAttempts", ConfigOption::number(5.0).between(1.0, 20.0))
            .option("heartbeatInterval", ConfigOption::number(30000.0).between(5000.0, 60000.0)),
        ComponentType::new("hl-mev-bot", "Hyperliquid MEV Bot", "MEV", Hyperliquid)
            .describe("Detect and capture MEV opportunities")
            .ports(
                &["mempool", "gasPrice", "profitThreshold", "strategies"],
                &["mevOpportunities", "profitExtracted", "successRate"],
            )
            .option("minProfitUsd", ConfigOption::number(10.0).between(1.0, 1000.0))
            .option("maxGasPrice", ConfigOption::number(100.0).between(10.0, 500.0))
            .option(
                "strategies",
                ConfigOption::select("arbitrage", &["arbitrage", "sandwich", "liquidation", "all"]),
            ),
        ComponentType::new("hl-flash-loan", "Hyperliquid Flash Loan Engine", "Advanced Trading", Hyperliquid)
            .describe("Borrow and repay within a single transaction")
            .ports(
                &["loanAmount", "strategy", "collateral", "repaymentBuffer"],
                &["loanStatus", "profit", "gasUsed", "executionTime"],
            )
            .option("maxLoanAmount", ConfigOption::number(100000.0).between(1000.0, 10_000_000.0))
            .option("profitMargin", ConfigOption::range(0.1, 0.01, 1.0))
            .option("slippageTolerance", ConfigOption::range(0.5, 0.1, 2.0)),
        ComponentType::new(
            "hl-liquidation-bot",
            "Hyperliquid Liquidation Bot",
            "Advanced Trading",
            Hyperliquid,
        )
        .describe("Liquidate unhealthy positions for profit")
        .ports(
            &["positions", "healthThreshold", "gasPrice", "profitMargin"],
            &["liquidatedPositions", "profit", "gasUsed", "successRate"],
        )
        .option("healthThreshold", ConfigOption::range(1.1, 1.0, 1.5))
        .option("minProfitUsd", ConfigOption::number(50.0).between(10.0, 1000.0))
        .option("maxGasPrice", ConfigOption::number(150.0).between(50.0, 500.0)),
        ComponentType::new(
            "hl-cross-chain-bridge",
            "Hyperliquid Cross-Chain Bridge",
            "Cross-Chain",
            Hyperliquid,
        )
        .describe("Move assets between chains and Hyperliquid")
        .ports(
            &["sourceChain", "targetChain", "asset", "amount", "recipient"],
            &["bridgeStatus", "fees", "estimatedTime", "transactionHash"],
        )
        .option(
            "sourceChain",
            ConfigOption::select("ethereum", &["ethereum", "arbitrum", "polygon", "bsc", "avalanche"]),
        )
        .option("bridgeMode", ConfigOption::select("fast", &["fast", "secure", "economy"]))
        .option("slippageTolerance", ConfigOption::range(0.5, 0.1, 3.0)),
    ]
}

fn slot(type_id: &str, display_name: &str, config: Value) -> TemplateSlot {
    TemplateSlot {
        type_id: type_id.to_string(),
        display_name: display_name.to_string(),
        config: match config {
            Value::Object(map) => map,
            _ => Default::default(),
        },
    }
}

fn edge(from: &str, to: &str) -> TemplateEdge {
    TemplateEdge {
        from: from.to_string(),
        to: to.to_string(),
    }
}

fn template(
    id: &str,
    name: &str,
    category: &str,
    description: &str,
    slots: Vec<TemplateSlot>,
    edges: Vec<TemplateEdge>,
) -> TemplateDefinition {
    TemplateDefinition {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        slots,
        edges,
    }
}

pub fn builtin_templates() -> Vec<TemplateDefinition> {
    vec![
        template(
            "price-alert-trade",
            "Price Alert → Trade",
            "Quick Start",
            "Automatically place orders when price conditions are met",
            vec![
                slot("price-alert", "Price Alert", json!({ "asset": "ETH", "condition": "below", "target": 3000 })),
                slot("place-order", "Buy ETH", json!({ "asset": "ETH", "side": "buy", "amount": 1 })),
            ],
            vec![edge("price-alert", "place-order")],
        ),
        template(
            "schedule-rebalance",
            "Schedule → Rebalance",
            "Quick Start",
            "Periodically rebalance your portfolio",
            vec![
                slot("scheduler", "Daily Schedule", json!({ "interval": "1d" })),
                slot("vault-manager", "Rebalance Vault", json!({ "action": "deposit" })),
            ],
            vec![edge("scheduler", "vault-manager")],
        ),
        template(
            "trade-notify",
            "Trade → Notify",
            "Quick Start",
            "Send Discord notifications for all trades",
            vec![
                slot("market-data", "ETH Feed", json!({ "assets": "ETH" })),
                slot("place-order", "Market Order", json!({})),
                slot("discord-webhook", "Trade Alerts", json!({})),
            ],
            vec![edge("market-data", "place-order"), edge("place-order", "discord-webhook")],
        ),
        template(
            "hl-grid-bot-template",
            "Hyperliquid Grid Trading Bot",
            "Trading Bots",
            "Grid strategy that profits from volatility with orders at regular intervals",
            vec![
                slot("hl-api-connector", "Hyperliquid API", json!({})),
                slot("hl-grid-bot", "Grid Bot", json!({ "gridLevels": 10, "priceRange": "5%" })),
                slot("hl-risk-monitor", "Risk Monitor", json!({ "maxDrawdown": "10%" })),
                slot("hl-portfolio-tracker", "Portfolio Tracker", json!({})),
            ],
            vec![
                edge("hl-api-connector", "hl-grid-bot"),
                edge("hl-grid-bot", "hl-risk-monitor"),
                edge("hl-grid-bot", "hl-portfolio-tracker"),
            ],
        ),
        template(
            "hl-momentum-bot-template",
            "Hyperliquid Momentum Trading Bot",
            "Trading Bots",
            "Follow trends on perpetuals using technical indicators",
            vec![
                slot("hl-api-connector", "Hyperliquid API", json!({})),
                slot("hl-market-data", "Market Data", json!({ "indicators": ["RSI", "MACD", "EMA"] })),
                slot("hl-perp-trader", "Perp Trader", json!({ "leverage": "5x" })),
                slot("hl-risk-monitor", "Risk Monitor", json!({ "maxDrawdown": "15%" })),
            ],
            vec![
                edge("hl-api-connector", "hl-market-data"),
                edge("hl-market-data", "hl-perp-trader"),
                edge("hl-perp-trader", "hl-risk-monitor"),
            ],
        ),
        template(
            "hl-vault-strategy-template",
            "Hyperliquid Vault Strategy",
            "Vaults",
            "Run a managed vault backed by an on-chain trading contract",
            vec![
                slot("hl-vault-manager", "Vault Manager", json!({ "feeStructure": "2/20" })),
                slot("hl-trading-contract", "Trading Contract", json!({})),
                slot("hl-risk-monitor", "Risk Monitor", json!({ "maxDrawdown": "12%" })),
                slot("hl-portfolio-tracker", "Portfolio Tracker", json!({})),
            ],
            vec![
                edge("hl-vault-manager", "hl-trading-contract"),
                edge("hl-trading-contract", "hl-risk-monitor"),
                edge("hl-vault-manager", "hl-portfolio-tracker"),
            ],
        ),
        template(
            "hl-yield-farming-template",
            "Hyperliquid Yield Farming Strategy",
            "DeFi Strategies",
            "Farm HLP and PURR yields with automatic compounding",
            vec![
                slot("hl-yield-farmer", "Yield Farmer", json!({ "strategies": ["HLP", "PURR"] })),
                slot("hl-liquidity-provider", "LP Provider", json!({ "autoCompound": true })),
                slot("hl-portfolio-tracker", "Portfolio Tracker", json!({})),
                slot("hl-risk-monitor", "Risk Monitor", json!({ "maxDrawdown": "8%" })),
            ],
            vec![
                edge("hl-yield-farmer", "hl-liquidity-provider"),
                edge("hl-liquidity-provider", "hl-portfolio-tracker"),
                edge("hl-yield-farmer", "hl-risk-monitor"),
            ],
        ),
        template(
            "hl-arbitrage-template",
            "Hyperliquid Arbitrage Bot",
            "Trading Bots",
            "Capture price differences between Hyperliquid and other venues",
            vec![
                slot("hl-api-connector", "Hyperliquid API", json!({})),
                slot("hl-market-data", "Market Data", json!({ "exchanges": ["Binance", "OKX"] })),
                slot("hl-spot-trader", "Spot Trader", json!({ "orderType": "market" })),
                slot("hl-portfolio-tracker", "Portfolio Tracker", json!({})),
            ],
            vec![
                edge("hl-api-connector", "hl-market-data"),
                edge("hl-market-data", "hl-spot-trader"),
                edge("hl-spot-trader", "hl-portfolio-tracker"),
            ],
        ),
        template(
            "hl-dca-template",
            "Hyperliquid DCA Bot",
            "Trading Bots",
            "Dollar-cost average into a position on a fixed cadence",
            vec![
                slot("hl-api-connector", "Hyperliquid API", json!({})),
                slot("hl-spot-trader", "Spot Trader", json!({ "orderType": "market" })),
                slot("hl-portfolio-tracker", "Portfolio Tracker", json!({})),
            ],
            vec![
                edge("hl-api-connector", "hl-spot-trader"),
                edge("hl-spot-trader", "hl-portfolio-tracker"),
            ],
        ),
        template(
            "hl-analytics-template",
            "Hyperliquid Analytics Dashboard",
            "Analytics",
            "Monitor markets, portfolio value and risk in one place",
            vec![
                slot("hl-api-connector", "Hyperliquid API", json!({})),
                slot("hl-market-data", "Market Data", json!({})),
                slot("hl-portfolio-tracker", "Portfolio Tracker", json!({})),
                slot("hl-risk-monitor", "Risk Monitor", json!({})),
            ],
            vec![
                edge("hl-api-connector", "hl-market-data"),
                edge("hl-api-connector", "hl-portfolio-tracker"),
                edge("hl-portfolio-tracker", "hl-risk-monitor"),
            ],
        ),
        template(
            "hl-mev-template",
            "Hyperliquid MEV Extraction Bot",
            "Trading Bots",
            "Combine MEV detection with flash loans",
            vec![
                slot("hl-api-connector", "Hyperliquid API", json!({})),
                slot("hl-mev-bot", "MEV Bot", json!({ "strategies": "all", "minProfitUsd": 25 })),
                slot("hl-flash-loan", "Flash Loan Engine", json!({ "maxLoanAmount": 500000 })),
                slot("hl-risk-monitor", "Risk Monitor", json!({ "maxDrawdown": "20%" })),
            ],
            vec![
                edge("hl-api-connector", "hl-mev-bot"),
                edge("hl-mev-bot", "hl-flash-loan"),
                edge("hl-mev-bot", "hl-risk-monitor"),
            ],
        ),
        template(
            "hl-liquidation-template",
            "Hyperliquid Liquidation Hunter",
            "Trading Bots",
            "Hunt undercollateralized positions with flash-loan backed liquidations",
            vec![
                slot("hl-api-connector", "Hyperliquid API", json!({})),
                slot(
                    "hl-liquidation-bot",
                    "Liquidation Bot",
                    json!({ "healthThreshold": 1.05, "minProfitUsd": 100 }),
                ),
                slot("hl-flash-loan", "Flash Loan Engine", json!({ "maxLoanAmount": 1000000 })),
                slot("hl-portfolio-tracker", "Portfolio Tracker", json!({})),
            ],
            vec![
                edge("hl-api-connector", "hl-liquidation-bot"),
                edge("hl-liquidation-bot", "hl-flash-loan"),
                edge("hl-liquidation-bot", "hl-portfolio-tracker"),
            ],
        ),
        template(
            "hl-cross-chain-template",
            "Hyperliquid Cross-Chain Arbitrage",
            "DeFi Strategies",
            "Arbitrage across chains through the bridge",
            vec![
                slot("hl-api-connector", "Hyperliquid API", json!({})),
                slot("hl-cross-chain-bridge", "Cross-Chain Bridge", json!({ "bridgeMode": "fast" })),
                slot("hl-market-data", "Market Data", json!({ "exchanges": ["Binance", "OKX", "Bybit"] })),
                slot("hl-spot-trader", "Spot Trader", json!({ "orderType": "market" })),
                slot("hl-portfolio-tracker", "Portfolio Tracker", json!({})),
            ],
            vec![
                edge("hl-api-connector", "hl-market-data"),
                edge("hl-market-data", "hl-spot-trader"),
                edge("hl-spot-trader", "hl-cross-chain-bridge"),
                edge("hl-cross-chain-bridge", "hl-portfolio-tracker"),
            ],
        ),
        template(
            "hl-institutional-vault-template",
            "Hyperliquid Institutional Vault",
            "Vaults",
            "Institutional vault with yield overlay and risk controls",
            vec![
                slot(
                    "hl-vault-manager",
                    "Vault Manager",
                    json!({ "feeStructure": "1.5/15", "minDeposit": 50000 }),
                ),
                slot("hl-trading-contract", "Trading Contract", json!({})),
                slot("hl-risk-monitor", "Risk Monitor", json!({ "maxDrawdown": "8%" })),
                slot("hl-portfolio-tracker", "Portfolio Tracker", json!({})),
                slot("hl-yield-farmer", "Yield Farmer", json!({ "strategies": ["HLP", "PURR", "Vaults"] })),
            ],
            vec![
                edge("hl-vault-manager", "hl-trading-contract"),
                edge("hl-trading-contract", "hl-yield-farmer"),
                edge("hl-vault-manager", "hl-risk-monitor"),
                edge("hl-vault-manager", "hl-portfolio-tracker"),
            ],
        ),
    ]
}
