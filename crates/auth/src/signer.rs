//! HMAC-SHA256 request signing for the Coinbase REST API.

use crate::credentials::ApiCredentials;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

/// API version marker sent with every signed request.
pub const API_VERSION: &str = "2024-01-01";

pub const HEADER_ACCESS_KEY: &str = "CB-ACCESS-KEY";
pub const HEADER_ACCESS_SIGN: &str = "CB-ACCESS-SIGN";
pub const HEADER_ACCESS_TIMESTAMP: &str = "CB-ACCESS-TIMESTAMP";
pub const HEADER_ACCESS_PASSPHRASE: &str = "CB-ACCESS-PASSPHRASE";
pub const HEADER_VERSION: &str = "CB-VERSION";

/// Current Unix time in whole seconds.
pub fn unix_timestamp_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// Authentication headers for one request.
///
/// `timestamp` is the exact value that went into the signature.
pub struct SignedHeaders<'a> {
    pub api_key: &'a str,
    pub timestamp: i64,
    pub signature: String,
    passphrase: Option<&'a str>,
}

impl SignedHeaders<'_> {
    /// Render as `(name, value)` header pairs.
    pub fn header_pairs(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            (HEADER_ACCESS_KEY, self.api_key.to_string()),
            (HEADER_ACCESS_SIGN, self.signature.clone()),
            (HEADER_ACCESS_TIMESTAMP, self.timestamp.to_string()),
            (HEADER_VERSION, API_VERSION.to_string()),
        ];

        if let Some(passphrase) = self.passphrase {
            headers.push((HEADER_ACCESS_PASSPHRASE, passphrase.to_string()));
        }

        headers
    }
}

impl std::fmt::Debug for SignedHeaders<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedHeaders")
            .field("api_key", &self.api_key)
            .field("timestamp", &self.timestamp)
            .field("signature", &self.signature)
            .field("passphrase", &self.passphrase.map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Request signer for authenticated Coinbase API calls.
pub struct RequestSigner<'a> {
    credentials: &'a ApiCredentials,
}

impl<'a> RequestSigner<'a> {
    /// Create a new request signer with the given credentials.
    pub fn new(credentials: &'a ApiCredentials) -> Self {
        Self { credentials }
    }

    /// Sign a message and return the hex-encoded signature.
    ///
    /// This computes HMAC-SHA256 of the message using the secret
    /// and returns the result as a lowercase hex string.
    pub fn sign(&self, message: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.credentials.expose_secret().as_bytes())
            .expect("HMAC can take key of any size");

        mac.update(message.as_bytes());
        let result = mac.finalize();
        hex::encode(result.into_bytes())
    }

    /// Build the prehash string: `timestamp + METHOD + path + body`.
    ///
    /// Any query string on `path` is dropped.
    pub fn prehash(method: &str, path: &str, body: &str, timestamp: i64) -> String {
        let path = path.split_once('?').map_or(path, |(p, _)| p);
        format!(
            "{}{}{}{}",
            timestamp,
            method.to_ascii_uppercase(),
            path,
            body
        )
    }

    /// Sign a request at an explicit timestamp.
    ///
    /// # Arguments
    /// * `method` - HTTP method, any case
    /// * `path` - Request path, e.g. "/api/v3/brokerage/orders"
    /// * `body` - Raw request body, empty for GET
    /// * `timestamp` - Unix time in seconds
    pub fn sign_request(
        &self,
        method: &str,
        path: &str,
        body: &str,
        timestamp: i64,
    ) -> SignedHeaders<'a> {
        let signature = self.sign(&Self::prehash(method, path, body, timestamp));

        SignedHeaders {
            api_key: self.credentials.api_key(),
            timestamp,
            signature,
            passphrase: self.credentials.expose_passphrase(),
        }
    }

    /// Sign a request at the current time.
    pub fn sign_now(&self, method: &str, path: &str, body: &str) -> SignedHeaders<'a> {
        self.sign_request(method, path, body, unix_timestamp_secs())
    }
}
