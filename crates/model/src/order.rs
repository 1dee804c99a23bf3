//! Buy instructions read from configuration.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Exchange product symbol in `BASE-QUOTE` form, upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    /// Parse and normalise a product id.
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        let trimmed = raw.trim();
        let invalid = || ModelError::InvalidProductId(raw.to_string());

        let (base, quote) = trimmed.split_once('-').ok_or_else(invalid)?;
        let valid_part =
            |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric());

        if !valid_part(base) || !valid_part(quote) {
            return Err(invalid());
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProductId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProductId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProductId> for String {
    fn from(value: ProductId) -> Self {
        value.0
    }
}

/// A market buy of `amount_usd` worth of `product_id`.
///
/// Only constructible through [`Order::new`], so `amount_usd > 0` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    product_id: ProductId,
    amount_usd: Decimal,
}

impl Order {
    pub fn new(product_id: ProductId, amount_usd: Decimal) -> Result<Self, ModelError> {
        if amount_usd <= Decimal::ZERO {
            return Err(ModelError::NonPositiveAmount(amount_usd.to_string()));
        }

        Ok(Self {
            product_id,
            amount_usd,
        })
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn amount_usd(&self) -> Decimal {
        self.amount_usd
    }

    /// Quote size as sent to the exchange.
    ///
    /// Fixed-point decimal text, never exponent notation.
    pub fn quote_size(&self) -> String {
        self.amount_usd.to_string()
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${} of {}", self.amount_usd, self.product_id)
    }
}
