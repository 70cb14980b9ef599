/// Trading, notification and activity endpoints
///
/// These back the palette's live components. Trading goes through the mock
/// Hyperliquid backend; a placed order is announced on Discord when a webhook
/// is configured. Notification failures never fail the trade.

use super::{error::ApiError, state::AppState};
use crate::{
    integrations::{
        ActivityRecord, MarketData, Notification, Notifier, NotifyOutcome, OrderRequest,
        OrderResponse, RequestRejection, VaultAction, VaultResponse,
    },
    workflow::catalog::SUPPORTED_ASSETS,
};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Activity entries returned when no limit is given
const DEFAULT_ACTIVITY_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ActivityList {
    pub activity: Vec<ActivityRecord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscordTestRequest {
    #[serde(default)]
    pub webhook_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeliveryResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

pub fn create_trading_routes() -> Router<AppState> {
    Router::new()
        .route("/api/market-data/{asset}", get(get_market_data))
        .route("/api/place-order", post(place_order))
        .route("/api/manage-vault", post(manage_vault))
        .route("/api/activity", get(list_activity))
        .route("/api/discord/alerts", post(send_alert))
        .route("/api/discord/test", post(test_webhook))
}

/// GET /api/market-data/{asset}
async fn get_market_data(
    State(state): State<AppState>,
    Path(asset): Path<String>,
) -> Result<Json<MarketData>, ApiError> {
    let asset = asset.to_ascii_uppercase();
    if !SUPPORTED_ASSETS.contains(&asset.as_str()) {
        return Err(RequestRejection::UnsupportedAsset(asset).into());
    }

    let data = state
        .trading
        .get_market_data(&asset)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to fetch market data for {}", asset), e))?;
    Ok(Json(data))
}

/// POST /api/place-order
/// Body: { "asset": "ETH", "amount": 100, "price": 3100, "isBuy": true, "orderType": "limit" }
async fn place_order(
    State(state): State<AppState>,
    Json(order): Json<OrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    order.validate()?;

    let result = state
        .trading
        .place_order(&order)
        .await
        .map_err(|e| ApiError::internal("Failed to place order", e))?;

    let notification = Notification::Trade {
        order: order.clone(),
        result: result.clone(),
    };
    if let NotifyOutcome::Failed { reason } = state.notifier.notify(&notification).await {
        tracing::warn!("⚠️ Trade notification for {} not delivered: {}", order.asset, reason);
    }

    tracing::info!(
        "💱 Placed {} order for {} ({})",
        order.order_type.as_str(),
        order.asset,
        result.order_id.as_deref().unwrap_or("no id")
    );
    Ok(Json(result))
}

/// POST /api/manage-vault
/// Body: { "action": "deposit", "amount": 500 }
async fn manage_vault(
    State(state): State<AppState>,
    Json(action): Json<VaultAction>,
) -> Result<Json<VaultResponse>, ApiError> {
    action.validate()?;

    let result = state
        .trading
        .manage_vault(&action)
        .await
        .map_err(|e| ApiError::internal("Failed to manage vault", e))?;
    Ok(Json(result))
}

/// GET /api/activity?limit=50
async fn list_activity(
    State(state): State<AppState>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<ActivityList>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT);
    let activity = state
        .event_log
        .recent(limit)
        .await
        .map_err(|e| ApiError::internal("Failed to read activity", e))?;
    Ok(Json(ActivityList { activity }))
}

fn delivery_result(outcome: NotifyOutcome, delivered: String) -> Result<Json<DeliveryResponse>, ApiError> {
    match outcome {
        NotifyOutcome::Delivered => Ok(Json(DeliveryResponse {
            success: true,
            message: delivered,
            timestamp: Utc::now(),
        })),
        NotifyOutcome::Skipped => Err(ApiError::bad_request(
            "webhook_not_configured",
            "Discord webhook not configured",
        )),
        NotifyOutcome::Failed { reason } => Err(ApiError::new(
            "notification_failed",
            reason,
            StatusCode::BAD_GATEWAY,
        )),
    }
}

/// POST /api/discord/alerts
/// Body: { "type": "system_alert", "alertLevel": "warning", "title": "...", "message": "..." }
async fn send_alert(
    State(state): State<AppState>,
    Json(notification): Json<Notification>,
) -> Result<Json<DeliveryResponse>, ApiError> {
    let kind = match &notification {
        Notification::Trade { .. } => "trade",
        Notification::Vault { .. } => "vault",
        Notification::MarketAlert { .. } => "market_alert",
        Notification::SystemAlert { .. } => "system_alert",
        Notification::ConnectionTest => "connection_test",
    };

    let outcome = state.notifier.notify(&notification).await;
    delivery_result(outcome, format!("{} alert sent successfully", kind))
}

/// POST /api/discord/test
/// Body: { "webhookUrl": "optional override" }
async fn test_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DeliveryResponse>, ApiError> {
    // An empty body tests the configured webhook
    let request: DiscordTestRequest = if body.is_empty() {
        DiscordTestRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::bad_request("invalid_request", e.to_string()))?
    };
    let webhook_url = request.webhook_url.filter(|url| !url.trim().is_empty());

    let outcome = match webhook_url {
        Some(url) => state.discord.with_webhook(url).notify(&Notification::ConnectionTest).await,
        None => state.notifier.notify(&Notification::ConnectionTest).await,
    };
    delivery_result(outcome, "Discord webhook connection successful".to_string())
}
