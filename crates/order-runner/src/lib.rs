//! Order placement runtime.
//!
//! This crate turns a list of configured orders into a [`RunReport`](model::RunReport):
//!
//! - **OrderGateway**: one-shot exchange calls (Coinbase client or dry run)
//! - **OrderPlacer**: bounded, fixed-delay retry around a single order
//! - **OrderRunner**: sequential run over all orders with per-order isolation
//! - **Notifier**: receives the final report (logs, JSON receipt)
//!
//! # Flow
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐     ┌─────────────────┐
//! │ OrderRunner │────>│ OrderPlacer      │────>│ OrderGateway    │
//! │ - in order  │     │ - client id      │     │ - CoinbaseRest  │
//! │ - isolate   │     │ - retry/delay    │     │ - DryRun        │
//! └─────────────┘     └──────────────────┘     └─────────────────┘
//!        │
//!        v
//! ┌─────────────┐
//! │ Notifier(s) │
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use order_runner::{OrderRunner, OrderRunnerConfig};
//!
//! let gateway = Arc::new(CoinbaseRestClient::new(credentials, environment)?);
//! let runner = OrderRunner::new(gateway, OrderRunnerConfig::default());
//! let report = runner.run(&orders).await;
//! ```

mod dry_run;
mod error;
mod gateway;
#[cfg(test)]
mod mock;
mod notify;
mod placer;
mod runner;

pub use dry_run::DryRunGateway;
pub use error::NotifyError;
pub use gateway::OrderGateway;
pub use notify::{LogNotifier, Notifier, ReceiptWriter};
pub use placer::OrderPlacer;
pub use runner::{notify_all, OrderRunner, OrderRunnerConfig};
