//! Generic REST client infrastructure.
//!
//! This crate provides a thin wrapper around `reqwest` with:
//!
//! - Consistent error handling via `RestError`
//! - GET and JSON POST with caller-supplied headers for authentication
//! - JSON response deserialization
//! - Error message extraction from JSON error bodies
//! - Rate limit detection
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_client::RestClient;
//!
//! let client = RestClient::new("https://api.coinbase.com", Duration::from_secs(30))?;
//! let response: CreateOrderResponse = client
//!     .post_json("/api/v3/brokerage/orders", body, &headers)
//!     .await?;
//! ```

mod client;
mod error;

pub use client::RestClient;
pub use error::RestError;
