/// API usage recording middleware
///
/// Records every `/api` request to the activity log after the response is
/// produced. Recording runs on a spawned task and never delays or fails the
/// request.

use super::state::AppState;
use crate::integrations::ActivityEvent;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

const USER_HEADER: &str = "x-user-id";

pub async fn record_usage(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let endpoint = request.uri().path().to_string();
    if !endpoint.starts_with("/api") {
        return next.run(request).await;
    }

    let method = request.method().to_string();
    let user_id = request
        .headers()
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let response = next.run(request).await;

    let event = ActivityEvent {
        endpoint,
        method,
        status: response.status().as_u16(),
        user_id,
    };
    let event_log = state.event_log.clone();
    tokio::spawn(async move {
        event_log.record(event).await;
    });

    response
}
