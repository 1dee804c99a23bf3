//! Dry run gateway for simulated order placement.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use coinbase_rest::{CoinbaseError, OrderAck};
use model::{FillDetails, Order};

use crate::gateway::OrderGateway;

/// Status reported for every simulated order.
const SIMULATED_STATUS: &str = "FILLED";

/// Acknowledges every buy without touching the network.
///
/// Lets a config be exercised end to end before real money is involved.
#[derive(Debug)]
pub struct DryRunGateway {
    next_order_id: AtomicU64,
}

impl Default for DryRunGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl DryRunGateway {
    pub fn new() -> Self {
        Self {
            next_order_id: AtomicU64::new(1_000_000),
        }
    }
}

#[async_trait]
impl OrderGateway for DryRunGateway {
    async fn market_buy(
        &self,
        order: &Order,
        client_order_id: &str,
    ) -> Result<OrderAck, CoinbaseError> {
        let order_id = format!(
            "dry-run-{}",
            self.next_order_id.fetch_add(1, Ordering::Relaxed)
        );

        tracing::info!(
            product_id = %order.product_id(),
            quote_size = %order.quote_size(),
            client_order_id = %client_order_id,
            order_id = %order_id,
            "Simulated market buy"
        );

        Ok(OrderAck {
            order_id,
            status: SIMULATED_STATUS.to_string(),
            client_order_id: client_order_id.to_string(),
        })
    }

    async fn order_fill(&self, _order_id: &str) -> Result<FillDetails, CoinbaseError> {
        Ok(FillDetails {
            status: SIMULATED_STATUS.to_string(),
            ..FillDetails::default()
        })
    }
}
