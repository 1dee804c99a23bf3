//! Coinbase API response types.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::CoinbaseError;

/// Status reported when the create-order response does not include one.
const DEFAULT_ACK_STATUS: &str = "PENDING";

/// Response from POST /api/v3/brokerage/orders.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub success_response: Option<SuccessResponse>,
    #[serde(default)]
    pub error_response: Option<ErrorResponse>,
}

/// Details of an accepted order.
#[derive(Debug, Clone, Deserialize)]
pub struct SuccessResponse {
    #[serde(default)]
    pub order_id: String,
}

/// Details of a declined order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_details: Option<String>,
    #[serde(default)]
    pub preview_failure_reason: Option<String>,
}

/// An order the exchange accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAck {
    pub order_id: String,
    pub status: String,
    pub client_order_id: String,
}

impl CreateOrderResponse {
    /// Classify the response into an acknowledgement or a rejection.
    pub fn into_ack(self, client_order_id: &str) -> Result<OrderAck, CoinbaseError> {
        if !self.success {
            return Err(CoinbaseError::rejection(
                self.error_response,
                self.failure_reason,
            ));
        }

        let order_id = self
            .success_response
            .map(|s| s.order_id)
            .filter(|id| !id.is_empty())
            .or(self.order_id.filter(|id| !id.is_empty()))
            .ok_or(CoinbaseError::MissingOrderId)?;

        Ok(OrderAck {
            order_id,
            status: self
                .status
                .unwrap_or_else(|| DEFAULT_ACK_STATUS.to_string()),
            client_order_id: client_order_id.to_string(),
        })
    }
}

/// Response from GET /api/v3/brokerage/orders/historical/{order_id}.
#[derive(Debug, Clone, Deserialize)]
pub struct GetOrderResponse {
    pub order: OrderSnapshot,
}

/// Current state of an order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderSnapshot {
    pub order_id: String,
    pub product_id: String,
    pub status: String,
    #[serde(default)]
    pub client_order_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub filled_size: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub filled_value: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub average_filled_price: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub total_fees: Option<Decimal>,
    #[serde(default)]
    pub created_time: Option<String>,
}

/// Deserialize an optional Decimal from a string; empty strings become `None`.
fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Deserialize::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
