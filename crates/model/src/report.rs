//! Per-order outcomes and the run summary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::order::{Order, ProductId};

/// Why an order ended in failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The exchange accepted the request but declined the order.
    Rejected,
    /// Every attempt hit a transport or authentication error.
    RetriesExhausted,
    /// A local error that no retry can fix, e.g. an unserializable request.
    Aborted,
}

/// Terminal state of one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum OrderOutcome {
    Success { order_id: String, status: String },
    Failure { kind: FailureKind, message: String },
}

/// Execution details of a placed order, as read back from the exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillDetails {
    pub status: String,
    /// Base currency bought.
    pub filled_size: Option<Decimal>,
    /// Quote currency spent, before fees.
    pub filled_value: Option<Decimal>,
    pub average_filled_price: Option<Decimal>,
    pub total_fees: Option<Decimal>,
}

/// Result of placing one configured order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResult {
    pub product_id: ProductId,
    pub amount_usd: Decimal,
    /// Idempotency token sent with every attempt for this order.
    pub client_order_id: String,
    /// Number of HTTP attempts made.
    pub attempts: u32,
    #[serde(flatten)]
    pub outcome: OrderOutcome,
    /// Present once the placed order has been looked up again.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<FillDetails>,
}

impl OrderResult {
    pub fn success(
        order: &Order,
        client_order_id: impl Into<String>,
        attempts: u32,
        order_id: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            product_id: order.product_id().clone(),
            amount_usd: order.amount_usd(),
            client_order_id: client_order_id.into(),
            attempts,
            outcome: OrderOutcome::Success {
                order_id: order_id.into(),
                status: status.into(),
            },
            fill: None,
        }
    }

    pub fn failure(
        order: &Order,
        client_order_id: impl Into<String>,
        attempts: u32,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            product_id: order.product_id().clone(),
            amount_usd: order.amount_usd(),
            client_order_id: client_order_id.into(),
            attempts,
            outcome: OrderOutcome::Failure {
                kind,
                message: message.into(),
            },
            fill: None,
        }
    }

    /// Attach fill details and take over their status.
    ///
    /// Failed orders are left untouched.
    pub fn apply_fill(&mut self, fill: FillDetails) {
        if let OrderOutcome::Success { status, .. } = &mut self.outcome {
            status.clone_from(&fill.status);
            self.fill = Some(fill);
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, OrderOutcome::Success { .. })
    }

    /// Exchange order id, if the order was placed.
    pub fn order_id(&self) -> Option<&str> {
        match &self.outcome {
            OrderOutcome::Success { order_id, .. } => Some(order_id),
            OrderOutcome::Failure { .. } => None,
        }
    }

    /// Failure message, if the order failed.
    pub fn failure_message(&self) -> Option<&str> {
        match &self.outcome {
            OrderOutcome::Success { .. } => None,
            OrderOutcome::Failure { message, .. } => Some(message),
        }
    }
}

/// Placed and failed orders from one run, each in config order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    #[serde(rename = "placed_orders")]
    pub placed: Vec<OrderResult>,
    #[serde(rename = "failed_orders")]
    pub failed: Vec<OrderResult>,
}

impl RunReport {
    /// Append a result to the list matching its outcome.
    pub fn record(&mut self, result: OrderResult) {
        if result.is_success() {
            self.placed.push(result);
        } else {
            self.failed.push(result);
        }
    }

    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Total quote amount across placed orders.
    pub fn total_placed_usd(&self) -> Decimal {
        self.placed.iter().map(|r| r.amount_usd).sum()
    }

    /// True when no order failed.
    pub fn all_placed(&self) -> bool {
        self.failed.is_empty()
    }
}
