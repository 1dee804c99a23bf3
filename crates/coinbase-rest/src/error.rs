//! Coinbase REST API error types.

use auth::AuthError;
use rest_client::RestError;
use thiserror::Error;

use crate::responses::ErrorResponse;

/// Errors that can occur when interacting with the Coinbase REST API.
#[derive(Debug, Error)]
pub enum CoinbaseError {
    /// REST client error (network, timeout, non-2xx status, etc.).
    #[error("REST client error: {0}")]
    Rest(#[from] RestError),

    /// Local credential problem, detected before any request.
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The exchange answered but declined the order (`success: false`).
    #[error("Order rejected ({reason}): {message}")]
    Rejected {
        /// Machine-readable reason, e.g. `INSUFFICIENT_FUND`.
        reason: String,
        /// Human-readable message from the exchange.
        message: String,
    },

    /// A successful response carried no order id.
    #[error("Order response missing order_id")]
    MissingOrderId,

    /// Failed to serialize the request body.
    #[error("Serialize error: {0}")]
    Serialize(String),
}

impl CoinbaseError {
    /// Build a rejection from the `success: false` fields of a create-order response.
    pub fn rejection(
        error_response: Option<ErrorResponse>,
        failure_reason: Option<String>,
    ) -> Self {
        let error_response = error_response.unwrap_or_default();
        let non_empty = |s: &Option<String>| s.clone().filter(|s| !s.is_empty());

        let reason = non_empty(&error_response.error)
            .or_else(|| non_empty(&failure_reason))
            .unwrap_or_else(|| "UNKNOWN_FAILURE_REASON".to_string());

        let message = non_empty(&error_response.message)
            .or_else(|| non_empty(&error_response.error_details))
            .or_else(|| non_empty(&error_response.preview_failure_reason))
            .or_else(|| non_empty(&failure_reason))
            .unwrap_or_else(|| reason.clone());

        Self::Rejected { reason, message }
    }

    /// Check if a fresh attempt of the same request could succeed.
    ///
    /// Rejections are final: retrying an order the exchange declined
    /// will not change the answer.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Rest(rest_err) => rest_err.is_retryable(),
            Self::MissingOrderId => true,
            Self::Auth(_) | Self::Rejected { .. } | Self::Serialize(_) => false,
        }
    }

    /// Check if this is an application-level rejection.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Message suitable for an order report.
    pub fn report_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Rest(RestError::HttpError { status, message }) => {
                format!("HTTP {}: {}", status, message)
            }
            other => other.to_string(),
        }
    }
}
