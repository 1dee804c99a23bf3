//! Authentication and signing for the Coinbase REST API.
//!
//! This crate provides secure credential management and request signing
//! for authenticated calls to Coinbase Advanced Trade.
//!
//! # Features
//!
//! - **Secure Credentials**: API secrets are wrapped in `SecretString` to prevent
//!   accidental logging and ensure memory is zeroed on drop.
//! - **HMAC-SHA256 Signing**: Signs `timestamp + METHOD + path + body` and emits the
//!   `CB-ACCESS-*` headers with the timestamp that was signed.
//! - **Environment Loading**: Credentials can be loaded from environment variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use auth::{ApiCredentials, RequestSigner};
//!
//! let credentials = ApiCredentials::from_env()?;
//! let signer = RequestSigner::new(&credentials);
//!
//! let signed = signer.sign_now("POST", "/api/v3/brokerage/orders", &body);
//! for (name, value) in signed.header_pairs() {
//!     request = request.header(name, value);
//! }
//! ```

mod credentials;
mod error;
mod signer;

pub use credentials::ApiCredentials;
pub use error::AuthError;
pub use signer::{
    unix_timestamp_secs, RequestSigner, SignedHeaders, API_VERSION, HEADER_ACCESS_KEY,
    HEADER_ACCESS_PASSPHRASE, HEADER_ACCESS_SIGN, HEADER_ACCESS_TIMESTAMP, HEADER_VERSION,
};
