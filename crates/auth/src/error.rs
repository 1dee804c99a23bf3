use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// A required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// The API key is empty.
    #[error("API key is empty")]
    EmptyApiKey,

    /// The API secret is empty or whitespace.
    #[error("API secret is empty")]
    EmptySecret,
}
