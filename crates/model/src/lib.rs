//! Domain types shared by the order client and the run orchestrator.

mod error;
mod order;
mod report;

pub use error::ModelError;
pub use order::{Order, ProductId};
pub use report::{FailureKind, FillDetails, OrderOutcome, OrderResult, RunReport};
