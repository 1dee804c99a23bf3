use auth::AuthError;
use coinbase_rest::CoinbaseError;
use model::ModelError;
use thiserror::Error;

/// Problems with the configuration, all detected before any order is sent.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// Config file is not valid YAML or has the wrong shape.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Order form from the environment is not a valid YAML/JSON list.
    #[error("invalid CUMULUS_ORDER_FORM: {0}")]
    OrderFormEnv(serde_yaml::Error),

    /// No section for the selected environment.
    #[error("config has no '{0}' section")]
    MissingSection(String),

    /// No orders to place.
    #[error("order form for '{0}' is empty")]
    EmptyOrderForm(String),

    /// An order form entry is malformed.
    #[error("order form entry {index}: {reason}")]
    InvalidOrder { index: usize, reason: String },

    /// An order form entry failed domain validation.
    #[error("order form entry {index}: {source}")]
    InvalidOrderValue { index: usize, source: ModelError },

    /// Retry settings are out of range.
    #[error("retry.max_attempts must be at least 1")]
    InvalidRetry,

    /// API base URL is not an http(s) URL.
    #[error("invalid API URL '{0}': expected http:// or https://")]
    InvalidApiUrl(String),

    /// Credentials in the config file are unusable.
    #[error("invalid credentials: {0}")]
    Credentials(#[from] AuthError),
}

/// Top-level errors that end the process with exit code 1.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("credentials error: {0}")]
    Auth(#[from] AuthError),

    #[error("exchange client error: {0}")]
    Client(#[from] CoinbaseError),
}
