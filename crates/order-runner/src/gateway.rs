//! The exchange seam used by the placer and the runner.

use async_trait::async_trait;
use coinbase_rest::{CoinbaseError, CoinbaseRestClient, OrderAck};
use model::{FillDetails, Order};

/// One-shot exchange operations.
///
/// Implementations make a single request per call and never retry;
/// [`OrderPlacer`](crate::OrderPlacer) owns the retry policy.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submit a market buy for `order`, tagged with `client_order_id`.
    async fn market_buy(
        &self,
        order: &Order,
        client_order_id: &str,
    ) -> Result<OrderAck, CoinbaseError>;

    /// Current status and fills of a previously placed order.
    async fn order_fill(&self, order_id: &str) -> Result<FillDetails, CoinbaseError>;
}

#[async_trait]
impl OrderGateway for CoinbaseRestClient {
    async fn market_buy(
        &self,
        order: &Order,
        client_order_id: &str,
    ) -> Result<OrderAck, CoinbaseError> {
        self.place_market_order(
            order.product_id().as_str(),
            order.amount_usd(),
            client_order_id,
        )
        .await
    }

    async fn order_fill(&self, order_id: &str) -> Result<FillDetails, CoinbaseError> {
        let snapshot = self.get_order(order_id).await?;

        Ok(FillDetails {
            status: snapshot.status,
            filled_size: snapshot.filled_size,
            filled_value: snapshot.filled_value,
            average_filled_price: snapshot.average_filled_price,
            total_fees: snapshot.total_fees,
        })
    }
}
