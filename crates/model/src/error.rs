use thiserror::Error;

/// Errors raised while constructing domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Product id is not of the form `BASE-QUOTE`.
    #[error("invalid product id '{0}', expected BASE-QUOTE (e.g. BTC-USD)")]
    InvalidProductId(String),

    /// Order amount must be strictly positive.
    #[error("order amount must be positive, got {0}")]
    NonPositiveAmount(String),
}
