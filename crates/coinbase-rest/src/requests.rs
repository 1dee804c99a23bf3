//! Coinbase API request bodies.

use serde::Serialize;

/// Body for POST /api/v3/brokerage/orders.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderRequest<'a> {
    pub client_order_id: &'a str,
    pub product_id: &'a str,
    pub side: &'static str,
    pub order_configuration: OrderConfiguration,
}

/// Order type selector; only immediate-or-cancel market orders are built.
#[derive(Debug, Clone, Serialize)]
pub struct OrderConfiguration {
    pub market_market_ioc: MarketIoc,
}

/// Market order sized in quote currency.
#[derive(Debug, Clone, Serialize)]
pub struct MarketIoc {
    /// Decimal text, e.g. "25.00".
    pub quote_size: String,
}

impl<'a> CreateOrderRequest<'a> {
    /// Market buy spending `quote_size` of the quote currency.
    pub fn market_buy(product_id: &'a str, quote_size: String, client_order_id: &'a str) -> Self {
        Self {
            client_order_id,
            product_id,
            side: "BUY",
            order_configuration: OrderConfiguration {
                market_market_ioc: MarketIoc { quote_size },
            },
        }
    }
}
