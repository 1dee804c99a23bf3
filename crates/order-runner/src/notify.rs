//! Notification of run results.

use std::fs;
use std::path::PathBuf;

use model::{OrderOutcome, RunReport};
use tracing::{info, warn};

use crate::error::NotifyError;

/// Receives the report at the end of a run.
pub trait Notifier: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn notify(&self, report: &RunReport) -> Result<(), NotifyError>;
}

/// Logs one line per order.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    fn notify(&self, report: &RunReport) -> Result<(), NotifyError> {
        for result in report.placed.iter().chain(report.failed.iter()) {
            match &result.outcome {
                OrderOutcome::Success { order_id, status } => info!(
                    product_id = %result.product_id,
                    amount_usd = %result.amount_usd,
                    order_id = %order_id,
                    status = %status,
                    "placed"
                ),
                OrderOutcome::Failure { kind, message } => warn!(
                    product_id = %result.product_id,
                    amount_usd = %result.amount_usd,
                    kind = ?kind,
                    message = %message,
                    attempts = result.attempts,
                    "failed"
                ),
            }
        }
        Ok(())
    }
}

/// Writes the report as a JSON receipt.
#[derive(Debug, Clone)]
pub struct ReceiptWriter {
    path: PathBuf,
}

impl ReceiptWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Notifier for ReceiptWriter {
    fn name(&self) -> &'static str {
        "receipt"
    }

    fn notify(&self, report: &RunReport) -> Result<(), NotifyError> {
        let json = serde_json::to_string_pretty(report)?;
        fs::write(&self.path, json)?;
        info!(path = %self.path.display(), "receipt written");
        Ok(())
    }
}
