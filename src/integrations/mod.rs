/// External collaborators
///
/// The builder core never calls these directly. Route handlers use them to
/// serve market data, place orders, move vault funds, record API activity and
/// post notifications. Each concern is a trait so the HTTP layer can be wired
/// against mocks in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Deterministic mock of the Hyperliquid trading API
pub mod hyperliquid;

// Discord webhook notifications
pub mod discord;

pub use discord::DiscordNotifier;
pub use hyperliquid::MockHyperliquidClient;

/// Smallest accepted order notional in USD
pub const MIN_ORDER_SIZE: f64 = 1.0;

/// Largest accepted order notional in USD
pub const MAX_ORDER_SIZE: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    pub asset: String,
    pub price: f64,
    pub volume_24h: f64,
    pub change_24h: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Market,
    Limit,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "market",
            OrderType::Limit => "limit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub asset: String,
    /// Notional in USD
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub is_buy: bool,
    pub order_type: OrderType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VaultOperation {
    Deposit,
    Withdraw,
}

impl VaultOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            VaultOperation::Deposit => "deposit",
            VaultOperation::Withdraw => "withdraw",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultAction {
    pub action: VaultOperation,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Request rejected before it reaches the trading backend
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestRejection {
    #[error("Invalid asset '{0}'. Supported: {supported}", supported = crate::workflow::catalog::SUPPORTED_ASSETS.join(", "))]
    UnsupportedAsset(String),

    #[error("Amount must be a positive number")]
    NonPositiveAmount,

    #[error("Amount must be between ${min} and ${max}", min = MIN_ORDER_SIZE, max = MAX_ORDER_SIZE)]
    AmountOutOfRange,

    #[error("Price is required for limit orders")]
    MissingLimitPrice,
}

impl OrderRequest {
    pub fn validate(&self) -> Result<(), RequestRejection> {
        if !crate::workflow::catalog::SUPPORTED_ASSETS.contains(&self.asset.as_str()) {
            return Err(RequestRejection::UnsupportedAsset(self.asset.clone()));
        }
        if self.amount <= 0.0 || !self.amount.is_finite() {
            return Err(RequestRejection::NonPositiveAmount);
        }
        if !(MIN_ORDER_SIZE..=MAX_ORDER_SIZE).contains(&self.amount) {
            return Err(RequestRejection::AmountOutOfRange);
        }
        if self.order_type == OrderType::Limit && !self.price.is_some_and(|price| price > 0.0) {
            return Err(RequestRejection::MissingLimitPrice);
        }
        Ok(())
    }
}

impl VaultAction {
    pub fn validate(&self) -> Result<(), RequestRejection> {
        if self.amount <= 0.0 || !self.amount.is_finite() {
            return Err(RequestRejection::NonPositiveAmount);
        }
        Ok(())
    }
}

/// One API call as recorded by the activity log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub endpoint: String,
    pub method: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Recorded activity with its storage metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub id: String,
    #[serde(flatten)]
    pub event: ActivityEvent,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketAlertKind {
    PriceTarget,
    SignificantChange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Error,
    Warning,
    Info,
}

/// Something worth telling the user about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    Trade {
        order: OrderRequest,
        result: OrderResponse,
    },
    Vault {
        action: VaultAction,
        success: bool,
        message: String,
    },
    MarketAlert {
        #[serde(rename = "marketData")]
        market_data: MarketData,
        #[serde(rename = "alertType", default = "default_alert_kind")]
        alert_type: MarketAlertKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        threshold: Option<f64>,
    },
    SystemAlert {
        #[serde(rename = "alertLevel", default = "default_alert_level")]
        level: AlertLevel,
        title: String,
        message: String,
    },
    ConnectionTest,
}

fn default_alert_kind() -> MarketAlertKind {
    MarketAlertKind::SignificantChange
}

fn default_alert_level() -> AlertLevel {
    AlertLevel::Info
}

/// Result of a delivery attempt; failures are values, never panics or errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NotifyOutcome {
    Delivered,
    /// No channel configured
    Skipped,
    Failed { reason: String },
}

/// Market data, orders and vault transfers
#[async_trait]
pub trait TradingBackend: Send + Sync {
    async fn get_market_data(&self, asset: &str) -> anyhow::Result<MarketData>;

    async fn place_order(&self, order: &OrderRequest) -> anyhow::Result<OrderResponse>;

    async fn manage_vault(&self, action: &VaultAction) -> anyhow::Result<VaultResponse>;
}

/// Fire-and-forget API activity log
#[async_trait]
pub trait EventLog: Send + Sync {
    /// Must not fail the caller; implementations swallow and log their errors
    async fn record(&self, event: ActivityEvent);

    async fn recent(&self, limit: u32) -> anyhow::Result<Vec<ActivityRecord>>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> NotifyOutcome;
}
