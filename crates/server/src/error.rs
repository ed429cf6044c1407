use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use database::error::ServiceError;
use log::error;
use serde_json::json;

/// Request-boundary error: one status code plus a client-facing message,
/// rendered in the uniform envelope the dashboard expects.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Not authorized, invalid token")
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let status = match &err {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::InvalidState(_) | ServiceError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Store(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Unexpected store/internal failures are logged server-side and
        // never echoed to clients.
        let message = match &err {
            ServiceError::Store(inner) => {
                error!("database error: {inner}");
                "Internal Server Error".to_string()
            }
            ServiceError::Internal(detail) => {
                error!("internal error: {detail}");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "statusCode": self.status.as_u16(),
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}
