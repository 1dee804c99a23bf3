//! Coinbase Advanced Trade REST client.
//!
//! This crate provides a typed client for the Coinbase REST API with:
//!
//! - **Order placement**: quote-sized market buys with a caller-supplied idempotency token
//! - **Order lookup**: current status and fills of a placed order
//! - **Signing**: every request carries `CB-ACCESS-*` headers from the `auth` crate
//! - **Error handling**: `success: false` responses become `CoinbaseError::Rejected`,
//!   everything on the wire becomes `CoinbaseError::Rest`
//!
//! # Example
//!
//! ```rust,ignore
//! use auth::ApiCredentials;
//! use coinbase_rest::CoinbaseRestClient;
//! use common::CoinbaseEnvironment;
//!
//! let credentials = ApiCredentials::from_env()?;
//! let client = CoinbaseRestClient::new(credentials, CoinbaseEnvironment::Sandbox)?;
//!
//! let ack = client
//!     .place_market_order("BTC-USD", dec!(25.00), &uuid::Uuid::new_v4().to_string())
//!     .await?;
//! let snapshot = client.get_order(&ack.order_id).await?;
//! ```

mod client;
mod error;
mod requests;
mod responses;

pub use client::{CoinbaseRestClient, ORDERS_PATH};
pub use error::CoinbaseError;
pub use requests::{CreateOrderRequest, MarketIoc, OrderConfiguration};
pub use responses::{
    CreateOrderResponse, ErrorResponse, GetOrderResponse, OrderAck, OrderSnapshot,
    SuccessResponse,
};
