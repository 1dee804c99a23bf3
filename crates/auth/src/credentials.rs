//! Secure API credential management.
//!
//! Uses the `secrecy` crate to prevent accidental logging of secrets
//! and ensures memory is zeroed on drop.

use crate::error::AuthError;
use secrecy::{ExposeSecret, SecretString};

const API_KEY_VAR: &str = "COINBASE_API_KEY";
const API_SECRET_VAR: &str = "COINBASE_API_SECRET";
const API_PASSPHRASE_VAR: &str = "COINBASE_API_PASSPHRASE";

/// API credentials for authenticated requests.
///
/// The secret and the optional passphrase are wrapped in `SecretString` which:
/// - Prevents accidental Debug/Display printing
/// - Zeros memory on drop via zeroize
#[derive(Clone)]
pub struct ApiCredentials {
    api_key: String,
    api_secret: SecretString,
    passphrase: Option<SecretString>,
}

impl ApiCredentials {
    /// Load credentials from environment variables.
    ///
    /// Looks for:
    /// - `COINBASE_API_KEY` - The API key (public)
    /// - `COINBASE_API_SECRET` - The signing secret (private)
    /// - `COINBASE_API_PASSPHRASE` - Optional, only for legacy keys
    ///
    /// # Errors
    /// Returns `AuthError::MissingEnvVar` if the key or secret is not set,
    /// or a validation error if either is empty.
    ///
    /// A `.env` file is not read here; the binary loads it once at startup.
    pub fn from_env() -> Result<Self, AuthError> {
        let api_key = std::env::var(API_KEY_VAR)
            .map_err(|_| AuthError::MissingEnvVar(API_KEY_VAR.into()))?;

        let api_secret = std::env::var(API_SECRET_VAR)
            .map_err(|_| AuthError::MissingEnvVar(API_SECRET_VAR.into()))?;

        let passphrase = std::env::var(API_PASSPHRASE_VAR)
            .ok()
            .filter(|p| !p.is_empty());

        let credentials = Self::new(api_key, api_secret);
        let credentials = match passphrase {
            Some(p) => credentials.with_passphrase(p),
            None => credentials,
        };

        credentials.validate()?;
        Ok(credentials)
    }

    /// Create credentials from explicit values.
    ///
    /// Useful for testing or when credentials come from a config file.
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            api_key,
            api_secret: SecretString::from(api_secret),
            passphrase: None,
        }
    }

    /// Attach a passphrase (legacy Coinbase Pro keys).
    pub fn with_passphrase(mut self, passphrase: String) -> Self {
        self.passphrase = Some(SecretString::from(passphrase));
        self
    }

    /// Check that the key and secret are usable for signing.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.api_key.trim().is_empty() {
            return Err(AuthError::EmptyApiKey);
        }
        if self.api_secret.expose_secret().trim().is_empty() {
            return Err(AuthError::EmptySecret);
        }
        Ok(())
    }

    /// Get the API key (public, safe to log).
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Expose the secret for signing.
    ///
    /// **WARNING**: Only use this for cryptographic operations.
    /// Never log or display the return value.
    pub fn expose_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }

    /// Expose the passphrase, if any, for the request header.
    pub fn expose_passphrase(&self) -> Option<&str> {
        self.passphrase.as_ref().map(|p| p.expose_secret())
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field(
                "passphrase",
                &self.passphrase.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
