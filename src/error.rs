use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::item::ValidationErrors;
use crate::models::ErrorEnvelope;

/// Custom error type for API endpoints
///
/// Every variant renders as an [`ErrorEnvelope`], so no failure leaves the
/// HTTP layer in any other shape.
#[derive(Debug)]
pub enum ApiError {
    /// Path id is not a 24-character hex ObjectId
    InvalidId(String),
    /// One or more schema constraints failed
    Validation(ValidationErrors),
    /// Well-formed id with no matching item
    NotFound,
    /// Invalid list query parameter
    InvalidQueryParam(String),
    /// Failure outside the handled classes; `detail` reaches the client only
    /// when `expose` is set (development)
    Unhandled { detail: String, expose: bool },
    /// Storage operation failed; `action` names the operation for the client
    Storage {
        action: &'static str,
        source: anyhow::Error,
    },
    /// No route for this method and path
    RouteNotFound { method: String, path: String },
}

impl ApiError {
    /// Route a failure through the generic 500 path, logging the full detail
    pub fn unhandled(detail: impl Into<String>, expose: bool) -> Self {
        let detail = detail.into();
        tracing::error!("Unhandled error: {}", detail);
        ApiError::Unhandled { detail, expose }
    }

    /// Wrap a storage failure, logging it with the operation it interrupted
    pub fn storage(action: &'static str, source: anyhow::Error) -> Self {
        tracing::error!("{}: {:#}", action, source);
        ApiError::Storage { action, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidId(_)
            | ApiError::Validation(_)
            | ApiError::InvalidQueryParam(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound | ApiError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Storage { .. } | ApiError::Unhandled { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::InvalidId(id) => {
                tracing::debug!("Rejected malformed item id: {}", id);
                ErrorEnvelope::failure("Invalid item ID format")
            }
            ApiError::Validation(errors) => {
                ErrorEnvelope::failure("Validation error").with_errors(errors.messages())
            }
            ApiError::NotFound => ErrorEnvelope::failure("Item not found"),
            ApiError::InvalidQueryParam(msg) => {
                ErrorEnvelope::failure("Invalid query parameter").with_error(msg)
            }
            ApiError::Unhandled { detail, expose } => {
                let error = if expose {
                    detail
                } else {
                    "Something went wrong".to_string()
                };
                ErrorEnvelope::failure("Internal server error").with_error(error)
            }
            ApiError::Storage { action, source } => {
                ErrorEnvelope::failure(action).with_error(format!("{:#}", source))
            }
            ApiError::RouteNotFound { method, path } => {
                ErrorEnvelope::failure(format!("Route {} {} not found", method, path))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}
