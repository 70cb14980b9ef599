/// Mock Hyperliquid trading backend
///
/// Stands in for the real exchange. No request is signed or sent anywhere;
/// prices come from a fixed reference table so responses are reproducible.

use super::{
    MarketData, OrderRequest, OrderResponse, TradingBackend, VaultAction, VaultResponse,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

/// Reference price, 24h volume and 24h change (percent) per supported asset
const REFERENCE_MARKETS: &[(&str, f64, f64, f64)] = &[
    ("BTC", 64_250.0, 1_850_000_000.0, 1.8),
    ("ETH", 3_120.0, 920_000_000.0, -0.6),
    ("SOL", 148.5, 310_000_000.0, 3.2),
    ("AVAX", 28.4, 95_000_000.0, -1.4),
    ("MATIC", 0.52, 48_000_000.0, 0.9),
    ("LINK", 14.2, 61_000_000.0, 2.1),
    ("UNI", 7.9, 33_000_000.0, -2.3),
    ("AAVE", 96.0, 27_000_000.0, 0.4),
    ("SUSHI", 0.78, 9_500_000.0, -3.1),
    ("CRV", 0.41, 14_000_000.0, 1.2),
];

#[derive(Debug, Clone, Default)]
pub struct MockHyperliquidClient;

impl MockHyperliquidClient {
    pub fn new() -> Self {
        Self
    }

    fn reference(asset: &str) -> Option<(f64, f64, f64)> {
        REFERENCE_MARKETS
            .iter()
            .find(|(symbol, ..)| symbol.eq_ignore_ascii_case(asset))
            .map(|&(_, price, volume, change)| (price, volume, change))
    }
}

#[async_trait]
impl TradingBackend for MockHyperliquidClient {
    async fn get_market_data(&self, asset: &str) -> Result<MarketData> {
        let (price, volume_24h, change_24h) = Self::reference(asset)
            .ok_or_else(|| anyhow::anyhow!("No market data for asset '{}'", asset))?;

        tracing::debug!("Serving mock market data for {}", asset);
        Ok(MarketData {
            asset: asset.to_ascii_uppercase(),
            price,
            volume_24h,
            change_24h,
            high_24h: price * 1.03,
            low_24h: price * 0.97,
            timestamp: Utc::now(),
        })
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderResponse> {
        order.validate()?;

        let order_id = format!("order_{}", Uuid::new_v4().simple());
        tracing::info!(
            "Mock {} {} order for ${} of {} accepted as {}",
            if order.is_buy { "buy" } else { "sell" },
            order.order_type.as_str(),
            order.amount,
            order.asset,
            order_id
        );

        Ok(OrderResponse {
            success: true,
            order_id: Some(order_id),
            message: format!("{} order placed successfully", order.order_type.as_str()),
            timestamp: Utc::now(),
        })
    }

    async fn manage_vault(&self, action: &VaultAction) -> Result<VaultResponse> {
        action.validate()?;

        tracing::info!("Mock vault {} of ${}", action.action.as_str(), action.amount);
        Ok(VaultResponse {
            success: true,
            message: format!("Vault {} of ${} completed", action.action.as_str(), action.amount),
            timestamp: Utc::now(),
        })
    }
}
