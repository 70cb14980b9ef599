/// API error type and the BuilderError -> HTTP status mapping
///
/// Rendered as `{"error": {"code", "message", "status"}}`.

use crate::error::BuilderError;
use crate::integrations::RequestRejection;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug)]
pub struct ApiError {
    pub code: &'static str,
    pub message: String,
    pub status: StatusCode,
}

impl ApiError {
    pub fn new(code: &'static str, message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            code,
            message: message.into(),
            status,
        }
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(code, message, StatusCode::BAD_REQUEST)
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(code, message, StatusCode::NOT_FOUND)
    }

    /// Logs the underlying error; the response carries only `message`
    pub fn internal(message: impl Into<String>, error: anyhow::Error) -> Self {
        let message = message.into();
        tracing::error!("❌ {}: {:#}", message, error);
        Self::new("internal_error", message, StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<BuilderError> for ApiError {
    fn from(err: BuilderError) -> Self {
        let status = match &err {
            BuilderError::UnknownComponentType(_) | BuilderError::UnknownComponent(_) => {
                StatusCode::NOT_FOUND
            }

            BuilderError::DuplicateComponent(_) | BuilderError::DuplicateConnection(_) => {
                StatusCode::CONFLICT
            }

            BuilderError::SelfLoop(_)
            | BuilderError::PortCapabilityViolation { .. }
            | BuilderError::NotEmittable(_)
            | BuilderError::NoPendingConnection
            | BuilderError::IncompleteInsert(_)
            | BuilderError::TemplateEdgeUnresolved { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        };

        Self::new(err.code(), err.to_string(), status)
    }
}

impl From<RequestRejection> for ApiError {
    fn from(rejection: RequestRejection) -> Self {
        Self::bad_request("invalid_request", rejection.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "code": self.code,
                "message": self.message,
                "status": self.status.as_u16()
            }
        });
        (self.status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::types::PortDirection;

    #[test]
    fn builder_errors_map_to_statuses() {
        let cases = [
            (BuilderError::UnknownComponent("x".into()), StatusCode::NOT_FOUND),
            (BuilderError::UnknownComponentType("x".into()), StatusCode::NOT_FOUND),
            (BuilderError::SelfLoop("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (BuilderError::NoPendingConnection, StatusCode::UNPROCESSABLE_ENTITY),
            (BuilderError::DuplicateComponent("x".into()), StatusCode::CONFLICT),
            (BuilderError::DuplicateConnection("conn-x".into()), StatusCode::CONFLICT),
            (
                BuilderError::PortCapabilityViolation {
                    component_id: "x".into(),
                    type_id: "user-balance".into(),
                    direction: PortDirection::Output,
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];

        for (err, status) in cases {
            let code = err.code();
            let api_err = ApiError::from(err);
            assert_eq!(api_err.status, status);
            assert_eq!(api_err.code, code);
        }
    }

    #[test]
    fn rejections_are_bad_requests() {
        let api_err = ApiError::from(RequestRejection::MissingLimitPrice);
        assert_eq!(api_err.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_err.message, "Price is required for limit orders");
    }
}
