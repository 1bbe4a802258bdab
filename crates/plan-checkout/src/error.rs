//! Checkout Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Checkout-related errors
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// Missing or invalid configuration (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request body could not be parsed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Stripe API or network error
    #[error("Stripe error: {0}")]
    Provider(String),

    /// Provider call did not complete in time
    #[error("Stripe request timed out after {0}s")]
    Timeout(u64),

    /// Session created without a redirect URL
    #[error("No checkout URL returned")]
    MissingUrl,
}

impl CheckoutError {
    /// Whether this error happened before any request could be served
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(feature = "axum-handlers")]
mod response {
    use axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    use serde::Serialize;

    use super::CheckoutError;

    #[derive(Debug, Serialize)]
    struct ErrorBody {
        error: String,
    }

    // Every failure is surfaced as a 500; callers are expected to resubmit.
    impl IntoResponse for CheckoutError {
        fn into_response(self) -> Response {
            tracing::error!(error = %self, "Checkout failed");

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: self.to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_config_is_fatal() {
        assert!(CheckoutError::Config("STRIPE_SECRET_KEY not set".into()).is_fatal());
        assert!(!CheckoutError::Provider("No such price".into()).is_fatal());
        assert!(!CheckoutError::MissingUrl.is_fatal());
    }

    #[test]
    fn test_provider_message_is_preserved() {
        let err = CheckoutError::Provider("No such price: 'price_x'".into());
        assert!(err.to_string().contains("No such price: 'price_x'"));
    }
}
