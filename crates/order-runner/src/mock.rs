//! Scripted gateway for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use coinbase_rest::{CoinbaseError, OrderAck};
use model::{FillDetails, Order, ProductId};
use rest_client::RestError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::gateway::OrderGateway;

/// How the mock answers buys for one product.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Behavior {
    Succeed,
    FailTransport,
    Reject(&'static str),
    /// Time out on the first `n` attempts, then succeed.
    FailTimes(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Call {
    pub product_id: String,
    pub client_order_id: String,
}

#[derive(Default)]
pub(crate) struct MockGateway {
    behaviors: HashMap<String, Behavior>,
    status_fails: bool,
    calls: Mutex<Vec<Call>>,
    status_calls: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, product_id: &str, behavior: Behavior) -> Self {
        self.behaviors.insert(product_id.to_string(), behavior);
        self
    }

    pub fn with_failing_status(mut self) -> Self {
        self.status_fails = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn attempts_for(&self, product_id: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.product_id == product_id)
            .count()
    }

    pub fn status_calls(&self) -> Vec<String> {
        self.status_calls.lock().unwrap().clone()
    }
}

pub(crate) fn order(product_id: &str, amount: Decimal) -> Order {
    Order::new(ProductId::parse(product_id).unwrap(), amount).unwrap()
}

#[async_trait]
impl OrderGateway for MockGateway {
    async fn market_buy(
        &self,
        order: &Order,
        client_order_id: &str,
    ) -> Result<OrderAck, CoinbaseError> {
        let product_id = order.product_id().to_string();
        let attempt = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Call {
                product_id: product_id.clone(),
                client_order_id: client_order_id.to_string(),
            });
            calls.iter().filter(|c| c.product_id == product_id).count()
        };

        let ack = || OrderAck {
            order_id: format!("order-{}", product_id),
            status: "PENDING".to_string(),
            client_order_id: client_order_id.to_string(),
        };

        match self
            .behaviors
            .get(&product_id)
            .copied()
            .unwrap_or(Behavior::Succeed)
        {
            Behavior::Succeed => Ok(ack()),
            Behavior::FailTransport => Err(CoinbaseError::Rest(RestError::Connection(
                "connection reset by peer".into(),
            ))),
            Behavior::Reject(message) => Err(CoinbaseError::Rejected {
                reason: "INSUFFICIENT_FUND".into(),
                message: message.into(),
            }),
            Behavior::FailTimes(n) if attempt <= n => Err(CoinbaseError::Rest(RestError::Timeout)),
            Behavior::FailTimes(_) => Ok(ack()),
        }
    }

    async fn order_fill(&self, order_id: &str) -> Result<FillDetails, CoinbaseError> {
        self.status_calls.lock().unwrap().push(order_id.to_string());
        if self.status_fails {
            return Err(CoinbaseError::Rest(RestError::Timeout));
        }

        Ok(FillDetails {
            status: "FILLED".to_string(),
            filled_size: Some(dec!(0.00049)),
            filled_value: Some(dec!(24.85)),
            average_filled_price: Some(dec!(50714.28)),
            total_fees: Some(dec!(0.15)),
        })
    }
}
