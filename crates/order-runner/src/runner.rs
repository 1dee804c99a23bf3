//! Run orchestrator - places every configured order in sequence.

use std::sync::Arc;

use common::RetryPolicy;
use model::{Order, RunReport};
use tracing::{debug, info, warn};

use crate::gateway::OrderGateway;
use crate::notify::Notifier;
use crate::placer::OrderPlacer;

/// Configuration for the order runner.
#[derive(Debug, Clone, Default)]
pub struct OrderRunnerConfig {
    /// Retry schedule for each order.
    pub retry: RetryPolicy,
    /// Re-read the status of placed orders once all orders are submitted.
    pub refresh_placed: bool,
}

/// Places orders one at a time and collects the results.
///
/// Orders are processed in the order given. A failed order never stops
/// the ones after it.
pub struct OrderRunner {
    config: OrderRunnerConfig,
    gateway: Arc<dyn OrderGateway>,
    placer: OrderPlacer,
}

impl OrderRunner {
    /// Create a new runner on top of `gateway`.
    pub fn new(gateway: Arc<dyn OrderGateway>, config: OrderRunnerConfig) -> Self {
        Self {
            placer: OrderPlacer::new(Arc::clone(&gateway), config.retry),
            gateway,
            config,
        }
    }

    /// Place every order and report what was placed and what failed.
    pub async fn run(&self, orders: &[Order]) -> RunReport {
        info!(
            order_count = orders.len(),
            max_attempts = self.config.retry.max_attempts(),
            "starting order run"
        );

        let mut report = RunReport::default();

        for (index, order) in orders.iter().enumerate() {
            debug!(index, order = %order, "processing order");
            let result = self.placer.place_market_order(order).await;
            report.record(result);
        }

        if self.config.refresh_placed {
            self.refresh_fills(&mut report).await;
        }

        info!(
            placed = report.placed_count(),
            failed = report.failed_count(),
            total_placed_usd = %report.total_placed_usd(),
            "order run complete"
        );

        report
    }

    /// Run, then hand the report to each notifier.
    ///
    /// Notifier errors are logged and otherwise ignored.
    pub async fn run_and_notify(
        &self,
        orders: &[Order],
        notifiers: &[Box<dyn Notifier>],
    ) -> RunReport {
        let report = self.run(orders).await;
        notify_all(&report, notifiers);
        report
    }

    /// Look each placed order up again and record its status and fills.
    async fn refresh_fills(&self, report: &mut RunReport) {
        for result in report.placed.iter_mut() {
            let Some(order_id) = result.order_id().map(str::to_string) else {
                continue;
            };

            match self.gateway.order_fill(&order_id).await {
                Ok(fill) => {
                    debug!(
                        order_id = %order_id,
                        status = %fill.status,
                        filled_value = ?fill.filled_value,
                        total_fees = ?fill.total_fees,
                        "refreshed order"
                    );
                    result.apply_fill(fill);
                }
                Err(e) => {
                    warn!(order_id = %order_id, error = %e, "failed to refresh order");
                }
            }
        }
    }
}

/// Deliver a report to every notifier, logging failures.
pub fn notify_all(report: &RunReport, notifiers: &[Box<dyn Notifier>]) {
    for notifier in notifiers {
        if let Err(e) = notifier.notify(report) {
            warn!(notifier = notifier.name(), error = %e, "notification failed");
        }
    }
}
