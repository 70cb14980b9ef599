/// Discord webhook notifications
///
/// Builds embed payloads for trade, vault, market and system alerts and posts
/// them to the configured webhook. Delivery problems are reported as
/// `NotifyOutcome::Failed` and never surface as errors.

use super::{
    AlertLevel, MarketAlertKind, MarketData, Notification, Notifier, NotifyOutcome, OrderRequest,
    OrderResponse, VaultAction, VaultOperation,
};
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;

pub const COLOR_SUCCESS: u32 = 0x00d4ff;
pub const COLOR_ERROR: u32 = 0xff4444;
pub const COLOR_WARNING: u32 = 0xff00a8;
pub const COLOR_INFO: u32 = 0xe0e0e0;

const BOT_USERNAME: &str = "HyperEasy Bot";
const SYSTEM_USERNAME: &str = "HyperEasy System";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookPayload {
    pub username: String,
    pub embeds: Vec<Embed>,
}

fn field(name: &str, value: impl Into<String>, inline: bool) -> EmbedField {
    EmbedField {
        name: name.to_string(),
        value: value.into(),
        inline,
    }
}

fn embed(title: &str, description: Option<String>, color: u32, fields: Vec<EmbedField>, footer: &str) -> Embed {
    Embed {
        title: title.to_string(),
        description,
        color,
        fields,
        footer: EmbedFooter {
            text: format!("HyperEasy SDK • {}", footer),
        },
        timestamp: Utc::now().to_rfc3339(),
    }
}

/// Dollar amount with thousands separators and at most two decimals
pub fn format_usd(value: f64) -> String {
    let rounded = format!("{:.2}", value.abs());
    let (whole, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    match fraction.trim_end_matches('0') {
        "" => format!("{}${}", sign, grouped),
        fraction => format!("{}${}.{}", sign, grouped, fraction),
    }
}

fn status_value(success: bool) -> &'static str {
    if success {
        "✅ **SUCCESS**"
    } else {
        "❌ **FAILED**"
    }
}

pub fn trade_embed(order: &OrderRequest, result: &OrderResponse) -> Embed {
    let mut fields = vec![
        field("Asset", format!("**{}**", order.asset), true),
        field("Amount", format_usd(order.amount), true),
        field("Order Type", order.order_type.as_str().to_uppercase(), true),
        field(
            "Price",
            order.price.map(format_usd).unwrap_or_else(|| "Market Price".to_string()),
            true,
        ),
        field("Status", status_value(result.success), true),
        field("Order ID", result.order_id.clone().unwrap_or_else(|| "N/A".to_string()), true),
    ];
    if !result.success {
        let details = if result.message.is_empty() {
            "Unknown error occurred".to_string()
        } else {
            result.message.clone()
        };
        fields.push(field("Error Details", details, false));
    }

    embed(
        "🚀 HyperEasy Trade Alert",
        Some(format!(
            "{} order {}",
            if order.is_buy { "**BUY**" } else { "**SELL**" },
            if result.success { "executed" } else { "failed" }
        )),
        if result.success { COLOR_SUCCESS } else { COLOR_ERROR },
        fields,
        "Powered by Hyperliquid",
    )
}

pub fn vault_embed(action: &VaultAction, success: bool, message: &str) -> Embed {
    let operation = match action.action {
        VaultOperation::Deposit => "📥 Deposit",
        VaultOperation::Withdraw => "📤 Withdraw",
    };
    let mut fields = vec![
        field("Operation", operation, true),
        field("Amount", format_usd(action.amount), true),
        field("Status", status_value(success), true),
    ];
    if !success {
        fields.push(field("Error Details", message, false));
    }

    embed(
        "💰 Vault Operation",
        Some(format!(
            "**{}** {}",
            action.action.as_str().to_uppercase(),
            if success { "completed" } else { "failed" }
        )),
        if success { COLOR_SUCCESS } else { COLOR_ERROR },
        fields,
        "Vault Management",
    )
}

pub fn market_embed(data: &MarketData, kind: MarketAlertKind, threshold: Option<f64>) -> Embed {
    let rising = data.change_24h >= 0.0;
    let description = match kind {
        MarketAlertKind::PriceTarget => format!("**{}** has reached your target price!", data.asset),
        MarketAlertKind::SignificantChange => format!("**{}** has significant price movement!", data.asset),
    };

    let mut fields = vec![
        field("Current Price", format_usd(data.price), true),
        field(
            "24h Change",
            format!("{} {:.2}%", if rising { "📈" } else { "📉" }, data.change_24h),
            true,
        ),
        field("24h Volume", format!("${:.2}M", data.volume_24h / 1_000_000.0), true),
        field("24h High", format_usd(data.high_24h), true),
        field("24h Low", format_usd(data.low_24h), true),
    ];
    if let Some(threshold) = threshold.filter(|t| *t != 0.0) {
        fields.push(field("Alert Threshold", format!("{}%", threshold), true));
    }

    embed(
        "📊 Market Alert",
        Some(description),
        if rising { COLOR_SUCCESS } else { COLOR_WARNING },
        fields,
        "Market Data",
    )
}

pub fn system_embed(level: AlertLevel, title: &str, message: &str) -> Embed {
    let (icon, color) = match level {
        AlertLevel::Error => ("🚨", COLOR_ERROR),
        AlertLevel::Warning => ("⚠️", COLOR_WARNING),
        AlertLevel::Info => ("ℹ️", COLOR_INFO),
    };
    embed(
        &format!("{} {}", icon, title),
        Some(message.to_string()),
        color,
        Vec::new(),
        "System Alert",
    )
}

fn connection_test_embed() -> Embed {
    embed(
        "🧪 HyperEasy Connection Test",
        Some("Discord webhook is working correctly!".to_string()),
        COLOR_SUCCESS,
        vec![
            field("Status", "✅ Connected", true),
            field("Timestamp", Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(), true),
        ],
        "Connection Test",
    )
}

/// Webhook body for a notification
pub fn build_payload(notification: &Notification) -> WebhookPayload {
    let (embed, username) = match notification {
        Notification::Trade { order, result } => (trade_embed(order, result), BOT_USERNAME),
        Notification::Vault {
            action,
            success,
            message,
        } => (vault_embed(action, *success, message), BOT_USERNAME),
        Notification::MarketAlert {
            market_data,
            alert_type,
            threshold,
        } => (market_embed(market_data, *alert_type, *threshold), BOT_USERNAME),
        Notification::SystemAlert { level, title, message } => {
            (system_embed(*level, title, message), SYSTEM_USERNAME)
        }
        Notification::ConnectionTest => (connection_test_embed(), BOT_USERNAME),
    };

    WebhookPayload {
        username: username.to_string(),
        embeds: vec![embed],
    }
}

/// Posts notifications to a Discord webhook
#[derive(Debug, Clone)]
pub struct DiscordNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl DiscordNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        let webhook_url = webhook_url.filter(|url| !url.trim().is_empty());
        if webhook_url.is_none() {
            tracing::warn!("Discord webhook URL not configured, notifications will be skipped");
        }
        Self {
            client: reqwest::Client::new(),
            webhook_url,
        }
    }

    /// Notifier posting to a different webhook (used for connection tests)
    pub fn with_webhook(&self, webhook_url: String) -> Self {
        Self {
            client: self.client.clone(),
            webhook_url: Some(webhook_url),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn notify(&self, notification: &Notification) -> NotifyOutcome {
        let Some(url) = &self.webhook_url else {
            tracing::debug!("Skipping Discord notification, no webhook configured");
            return NotifyOutcome::Skipped;
        };

        let payload = build_payload(notification);
        let response = match self.client.post(url).json(&payload).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Discord notification failed: {}", e);
                return NotifyOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        let status = response.status();
        if status.is_success() {
            tracing::debug!("Discord notification delivered");
            return NotifyOutcome::Delivered;
        }

        let body = response.text().await.unwrap_or_default();
        let reason = format!("Discord webhook failed: {} {}", status.as_u16(), body);
        tracing::warn!("{}", reason);
        NotifyOutcome::Failed { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::OrderType;

    fn order(price: Option<f64>) -> OrderRequest {
        OrderRequest {
            asset: "ETH".to_string(),
            amount: 12_500.0,
            price,
            is_buy: true,
            order_type: if price.is_some() { OrderType::Limit } else { OrderType::Market },
        }
    }

    fn response(success: bool) -> OrderResponse {
        OrderResponse {
            success,
            order_id: success.then(|| "order_abc".to_string()),
            message: if success { "ok".to_string() } else { "insufficient margin".to_string() },
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn formats_dollars() {
        assert_eq!(format_usd(12_500.0), "$12,500");
        assert_eq!(format_usd(1_234_567.5), "$1,234,567.5");
        assert_eq!(format_usd(999.0), "$999");
        assert_eq!(format_usd(-42.25), "-$42.25");
    }

    #[test]
    fn successful_trade_embed() {
        let embed = trade_embed(&order(None), &response(true));

        assert_eq!(embed.color, COLOR_SUCCESS);
        assert_eq!(embed.description.as_deref(), Some("**BUY** order executed"));
        let names: Vec<&str> = embed.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Asset", "Amount", "Order Type", "Price", "Status", "Order ID"]);
        assert_eq!(embed.fields[3].value, "Market Price");
        assert_eq!(embed.fields[5].value, "order_abc");
        assert_eq!(embed.footer.text, "HyperEasy SDK • Powered by Hyperliquid");
    }

    #[test]
    fn failed_trade_embed_carries_details() {
        let embed = trade_embed(&order(Some(3_000.0)), &response(false));

        assert_eq!(embed.color, COLOR_ERROR);
        assert_eq!(embed.fields[3].value, "$3,000");
        assert_eq!(embed.fields[5].value, "N/A");
        let last = embed.fields.last().unwrap();
        assert_eq!(last.name, "Error Details");
        assert_eq!(last.value, "insufficient margin");
        assert!(!last.inline);
    }

    #[test]
    fn falling_market_uses_warning_color() {
        let data = MarketData {
            asset: "SOL".to_string(),
            price: 140.0,
            volume_24h: 12_340_000.0,
            change_24h: -4.5,
            high_24h: 150.0,
            low_24h: 138.0,
            timestamp: Utc::now(),
        };
        let embed = market_embed(&data, MarketAlertKind::SignificantChange, Some(5.0));

        assert_eq!(embed.color, COLOR_WARNING);
        assert_eq!(embed.fields[1].value, "📉 -4.50%");
        assert_eq!(embed.fields[2].value, "$12.34M");
        assert_eq!(embed.fields.last().unwrap().value, "5%");
    }

    #[test]
    fn system_alerts_use_system_username() {
        let payload = build_payload(&Notification::SystemAlert {
            level: AlertLevel::Error,
            title: "Scheduler".to_string(),
            message: "Tick failed".to_string(),
        });

        assert_eq!(payload.username, "HyperEasy System");
        assert_eq!(payload.embeds[0].title, "🚨 Scheduler");
        assert_eq!(payload.embeds[0].color, COLOR_ERROR);
        assert!(payload.embeds[0].fields.is_empty());
    }

    #[tokio::test]
    async fn unconfigured_notifier_skips() {
        let notifier = DiscordNotifier::new(None);
        assert!(!notifier.is_configured());
        assert_eq!(
            notifier.notify(&Notification::ConnectionTest).await,
            NotifyOutcome::Skipped
        );
    }

    #[tokio::test]
    async fn unreachable_webhook_reports_failure() {
        let notifier = DiscordNotifier::new(Some("http://127.0.0.1:9/webhook".to_string()));
        let outcome = notifier.notify(&Notification::ConnectionTest).await;
        assert!(matches!(outcome, NotifyOutcome::Failed { .. }));
    }
}
