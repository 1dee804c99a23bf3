//! Market order placement with bounded retry.

use std::sync::Arc;

use common::RetryPolicy;
use model::{FailureKind, Order, OrderResult};
use tracing::{info, warn};
use uuid::Uuid;

use crate::gateway::OrderGateway;

/// Places one order at a time, retrying transport failures.
///
/// Always returns an [`OrderResult`]; errors never escape.
pub struct OrderPlacer {
    gateway: Arc<dyn OrderGateway>,
    policy: RetryPolicy,
}

impl OrderPlacer {
    pub fn new(gateway: Arc<dyn OrderGateway>, policy: RetryPolicy) -> Self {
        Self { gateway, policy }
    }

    /// Place a market buy under a fresh client order id.
    pub async fn place_market_order(&self, order: &Order) -> OrderResult {
        let client_order_id = Uuid::new_v4().to_string();
        self.place_with_client_id(order, &client_order_id).await
    }

    /// Place a market buy, sending `client_order_id` on every attempt.
    ///
    /// Reusing the id lets the exchange deduplicate a retry whose earlier
    /// attempt was filled but whose response never arrived.
    pub async fn place_with_client_id(&self, order: &Order, client_order_id: &str) -> OrderResult {
        let mut attempt = 0;

        loop {
            attempt += 1;
            info!(
                product_id = %order.product_id(),
                amount_usd = %order.amount_usd(),
                attempt,
                max_attempts = self.policy.max_attempts(),
                "attempting purchase"
            );

            let err = match self.gateway.market_buy(order, client_order_id).await {
                Ok(ack) => {
                    info!(
                        product_id = %order.product_id(),
                        order_id = %ack.order_id,
                        status = %ack.status,
                        attempt,
                        "purchase started"
                    );
                    return OrderResult::success(
                        order,
                        client_order_id,
                        attempt,
                        ack.order_id,
                        ack.status,
                    );
                }
                Err(err) => err,
            };

            if err.is_rejection() {
                warn!(
                    product_id = %order.product_id(),
                    error = %err,
                    "purchase rejected"
                );
                return OrderResult::failure(
                    order,
                    client_order_id,
                    attempt,
                    FailureKind::Rejected,
                    err.report_message(),
                );
            }

            if !err.is_retryable() {
                warn!(
                    product_id = %order.product_id(),
                    error = %err,
                    "purchase aborted"
                );
                return OrderResult::failure(
                    order,
                    client_order_id,
                    attempt,
                    FailureKind::Aborted,
                    err.report_message(),
                );
            }

            if !self.policy.should_retry(attempt) {
                warn!(
                    product_id = %order.product_id(),
                    error = %err,
                    attempts = attempt,
                    "purchase failed, retries exhausted"
                );
                return OrderResult::failure(
                    order,
                    client_order_id,
                    attempt,
                    FailureKind::RetriesExhausted,
                    err.report_message(),
                );
            }

            warn!(
                product_id = %order.product_id(),
                error = %err,
                attempt,
                retry_in_ms = self.policy.delay().as_millis() as u64,
                "purchase attempt failed, retrying"
            );

            if !self.policy.delay().is_zero() {
                tokio::time::sleep(self.policy.delay()).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{order, Behavior, MockGateway};
    use coinbase_rest::{CoinbaseError, OrderAck};
    use model::{FillDetails, OrderOutcome};
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn placer(gateway: Arc<MockGateway>, max_attempts: u32) -> OrderPlacer {
        OrderPlacer::new(gateway, RetryPolicy::new(max_attempts, Duration::ZERO))
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let gateway = Arc::new(MockGateway::new());
        let result = placer(gateway.clone(), 3)
            .place_market_order(&order("BTC-USD", dec!(25.00)))
            .await;

        assert!(result.is_success());
        assert_eq!(result.attempts, 1);
        assert_eq!(result.order_id(), Some("order-BTC-USD"));
        assert_eq!(gateway.attempts_for("BTC-USD"), 1);
    }

    #[tokio::test]
    async fn test_stops_on_first_success_after_failures() {
        let gateway = Arc::new(MockGateway::new().with("BTC-USD", Behavior::FailTimes(2)));
        let result = placer(gateway.clone(), 3)
            .place_market_order(&order("BTC-USD", dec!(25)))
            .await;

        assert!(result.is_success());
        assert_eq!(result.attempts, 3);
        assert_eq!(gateway.attempts_for("BTC-USD"), 3);
    }

    #[tokio::test]
    async fn test_never_exceeds_max_attempts() {
        let gateway = Arc::new(MockGateway::new().with("BTC-USD", Behavior::FailTransport));
        let result = placer(gateway.clone(), 3)
            .place_market_order(&order("BTC-USD", dec!(25)))
            .await;

        assert_eq!(gateway.attempts_for("BTC-USD"), 3);
        assert_eq!(result.attempts, 3);
        match result.outcome {
            OrderOutcome::Failure { kind, message } => {
                assert_eq!(kind, FailureKind::RetriesExhausted);
                assert!(message.contains("connection reset"), "{message}");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rejection_is_not_retried() {
        let gateway = Arc::new(
            MockGateway::new().with("ETH-USD", Behavior::Reject("Insufficient balance")),
        );
        let result = placer(gateway.clone(), 3)
            .place_market_order(&order("ETH-USD", dec!(10)))
            .await;

        assert_eq!(gateway.attempts_for("ETH-USD"), 1);
        assert_eq!(result.attempts, 1);
        assert_eq!(
            result.outcome,
            OrderOutcome::Failure {
                kind: FailureKind::Rejected,
                message: "Insufficient balance".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_client_order_id_reused_across_retries() {
        let gateway = Arc::new(MockGateway::new().with("BTC-USD", Behavior::FailTimes(2)));
        let result = placer(gateway.clone(), 3)
            .place_market_order(&order("BTC-USD", dec!(25)))
            .await;

        let calls = gateway.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls
            .iter()
            .all(|c| c.client_order_id == result.client_order_id));
        assert!(Uuid::parse_str(&result.client_order_id).is_ok());
    }

    #[tokio::test]
    async fn test_client_order_id_distinct_across_orders() {
        let gateway = Arc::new(MockGateway::new());
        let placer = placer(gateway.clone(), 3);

        let a = placer.place_market_order(&order("BTC-USD", dec!(25))).await;
        let b = placer.place_market_order(&order("BTC-USD", dec!(25))).await;

        assert_ne!(a.client_order_id, b.client_order_id);
    }

    #[tokio::test]
    async fn test_single_attempt_policy() {
        let gateway = Arc::new(MockGateway::new().with("BTC-USD", Behavior::FailTransport));
        let result = OrderPlacer::new(gateway.clone(), RetryPolicy::no_retry())
            .place_market_order(&order("BTC-USD", dec!(25)))
            .await;

        assert!(!result.is_success());
        assert_eq!(gateway.attempts_for("BTC-USD"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_between_attempts_only() {
        let gateway = Arc::new(MockGateway::new().with("BTC-USD", Behavior::FailTransport));
        let placer = OrderPlacer::new(gateway, RetryPolicy::new(3, Duration::from_secs(1)));

        let started = tokio::time::Instant::now();
        let result = placer.place_market_order(&order("BTC-USD", dec!(25))).await;
        let elapsed = started.elapsed();

        assert!(!result.is_success());
        assert!(elapsed >= Duration::from_secs(2), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(3), "elapsed {elapsed:?}");
    }

    struct AbortingGateway;

    #[async_trait::async_trait]
    impl OrderGateway for AbortingGateway {
        async fn market_buy(
            &self,
            _order: &Order,
            _client_order_id: &str,
        ) -> Result<OrderAck, CoinbaseError> {
            Err(CoinbaseError::Serialize("bad body".into()))
        }

        async fn order_fill(&self, _order_id: &str) -> Result<FillDetails, CoinbaseError> {
            Ok(FillDetails::default())
        }
    }

    #[tokio::test]
    async fn test_local_error_aborts_without_retry() {
        let placer = OrderPlacer::new(Arc::new(AbortingGateway), RetryPolicy::default());
        let result = placer.place_market_order(&order("BTC-USD", dec!(1))).await;

        assert_eq!(result.attempts, 1);
        assert!(matches!(
            result.outcome,
            OrderOutcome::Failure {
                kind: FailureKind::Aborted,
                ..
            }
        ));
    }
}
