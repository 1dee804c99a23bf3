//! Coinbase environment selection.
//!
//! Orders go to the sandbox unless production is asked for explicitly.

use std::fmt;
use std::str::FromStr;

/// Coinbase Advanced Trade environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoinbaseEnvironment {
    /// Sandbox environment (no real funds).
    #[default]
    Sandbox,
    /// Production environment (real money).
    Production,
}

impl CoinbaseEnvironment {
    /// REST API base URL.
    pub fn rest_base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://api-sandbox.coinbase.com",
            Self::Production => "https://api.coinbase.com",
        }
    }

    /// Name of the config file section holding this environment's settings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }

    /// Returns true if this is the production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Returns true if this is the sandbox environment.
    pub fn is_sandbox(&self) -> bool {
        matches!(self, Self::Sandbox)
    }

    /// Load environment from the `CUMULUS_ENVIRONMENT` env var.
    ///
    /// Returns `Sandbox` if not set or invalid.
    pub fn from_env() -> Self {
        std::env::var("CUMULUS_ENVIRONMENT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for CoinbaseEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoinbaseEnvironment {
    type Err = ParseEnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" | "live" => Ok(Self::Production),
            "sandbox" | "test" | "testnet" => Ok(Self::Sandbox),
            _ => Err(ParseEnvironmentError(s.to_string())),
        }
    }
}

/// Error parsing environment string.
#[derive(Debug, Clone)]
pub struct ParseEnvironmentError(String);

impl fmt::Display for ParseEnvironmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid environment '{}', expected 'sandbox' or 'production'",
            self.0
        )
    }
}

impl std::error::Error for ParseEnvironmentError {}
