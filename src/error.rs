//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Pricing policy unavailable: {0}")]
    PolicyUnavailable(String),

    #[error("Quoted pricing policy v{quoted} is stale, current is v{current}")]
    StalePolicyVersion { quoted: i32, current: i32 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::InvalidConfiguration { message } => AppError::Validation(message),
            PricingError::PolicyUnavailable { package } => AppError::PolicyUnavailable(format!(
                "no labor price available for package '{package}'"
            )),
        }
    }
}

/// JSON error body
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
            }
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            AppError::PolicyUnavailable(msg) => {
                // Checkout must be blocked outright, never priced from thin air
                tracing::error!("Pricing policy unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "policy_unavailable")
            }
            AppError::StalePolicyVersion { .. } => (StatusCode::CONFLICT, "stale_policy_version"),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let message = match &self {
            AppError::Database(_) => "Database error".to_string(),
            AppError::Internal(_) => "Internal error".to_string(),
            other => other.to_string(),
        };

        (status, Json(ErrorBody { error, message })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_error_maps_to_validation() {
        let err: AppError = PricingError::InvalidConfiguration {
            message: "string_price must not be negative".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_stale_policy_display() {
        let err = AppError::StalePolicyVersion {
            quoted: 3,
            current: 4,
        };
        assert!(err.to_string().contains("v3"));
        assert!(err.to_string().contains("v4"));
    }
}
