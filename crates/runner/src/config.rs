//! YAML configuration: credentials, order form, and retry settings.
//!
//! ```yaml
//! retry:
//!   max_attempts: 3
//!   delay_ms: 1000
//! sandbox:
//!   coinbase:
//!     key: "..."
//!     secret: "..."
//!     url: "https://..."   # optional API base URL
//!   order_form:
//!     - asset: BTC-USD
//!       amount: 25.00
//!     - ETH-USD: "$10"
//! production:
//!   ...
//! ```
//!
//! Unquoted amounts are read as YAML numbers and may carry at most 15
//! significant digits. Quote anything more precise.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use auth::ApiCredentials;
use common::{CoinbaseEnvironment, RetryPolicy};
use model::{Order, ProductId};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::error::ConfigError;

/// Environment variable that replaces the file's order form.
pub const ORDER_FORM_VAR: &str = "CUMULUS_ORDER_FORM";

/// Environment variable with the API base URL, used when the file sets none.
pub const API_URL_VAR: &str = "COINBASE_API_URL";

/// Significant digits an f64 is guaranteed to carry through a decimal round trip.
const F64_DIGITS: usize = 15;

/// Keys accepted for the product in `{asset, amount}` entries.
const PRODUCT_KEYS: [&str; 3] = ["asset", "product", "product_id"];

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    retry: Option<RetrySettings>,
    #[serde(default)]
    sandbox: Option<EnvironmentSection>,
    #[serde(default)]
    production: Option<EnvironmentSection>,
}

#[derive(Debug, Deserialize)]
struct EnvironmentSection {
    #[serde(default, alias = "cbpro")]
    coinbase: Option<CredentialSection>,
    #[serde(default)]
    order_form: Vec<Value>,
}

#[derive(Deserialize)]
struct CredentialSection {
    key: String,
    secret: String,
    #[serde(default)]
    passphrase: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl std::fmt::Debug for CredentialSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSection")
            .field("key", &self.key)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// Retry settings as written in the file.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    RetryPolicy::default().max_attempts()
}

fn default_delay_ms() -> u64 {
    RetryPolicy::default().delay().as_millis() as u64
}

impl RetrySettings {
    fn into_policy(self) -> Result<RetryPolicy, ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidRetry);
        }
        Ok(RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.delay_ms),
        ))
    }
}

/// Everything a run needs, validated.
#[derive(Debug)]
pub struct Config {
    pub environment: CoinbaseEnvironment,
    /// Credentials from the file; `None` means fall back to the environment.
    pub credentials: Option<ApiCredentials>,
    pub orders: Vec<Order>,
    pub retry: RetryPolicy,
    /// API base URL replacing the environment's default.
    pub api_url: Option<String>,
}

impl Config {
    /// Load the section for `environment` from `path`.
    ///
    /// `order_form_override` (the raw value of `CUMULUS_ORDER_FORM`) replaces the
    /// file's order form. With an override, a missing file or section is not an error.
    pub fn load(
        path: &Path,
        environment: CoinbaseEnvironment,
        order_form_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == ErrorKind::NotFound && order_form_override.is_some() => {
                tracing::debug!(path = %path.display(), "no config file, using environment only");
                None
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        Self::from_sources(content.as_deref(), environment, order_form_override)
    }

    /// Build a config from YAML text and an optional order form override.
    pub fn from_sources(
        yaml: Option<&str>,
        environment: CoinbaseEnvironment,
        order_form_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut raw: RawConfig = match yaml {
            Some(text) if !text.trim().is_empty() => serde_yaml::from_str(text)?,
            _ => RawConfig::default(),
        };

        let section = match environment {
            CoinbaseEnvironment::Sandbox => raw.sandbox.take(),
            CoinbaseEnvironment::Production => raw.production.take(),
        };

        let (credentials, file_order_form) = match section {
            Some(section) => (section.coinbase, section.order_form),
            None if order_form_override.is_some() => (None, Vec::new()),
            None => return Err(ConfigError::MissingSection(environment.to_string())),
        };

        let order_form = match order_form_override {
            Some(text) => {
                serde_yaml::from_str::<Vec<Value>>(text).map_err(ConfigError::OrderFormEnv)?
            }
            None => file_order_form,
        };

        let orders = parse_order_form(&order_form)?;
        if orders.is_empty() {
            return Err(ConfigError::EmptyOrderForm(environment.to_string()));
        }

        let api_url = credentials
            .as_ref()
            .and_then(|section| section.url.as_deref())
            .map(parse_api_url)
            .transpose()?
            .flatten();
        let credentials = credentials.map(into_credentials).transpose()?;

        let retry = match raw.retry {
            Some(settings) => settings.into_policy()?,
            None => RetryPolicy::default(),
        };

        Ok(Self {
            environment,
            credentials,
            orders,
            retry,
            api_url,
        })
    }

    /// Use `env_url` (the raw value of `COINBASE_API_URL`) when the file set no URL.
    pub fn with_api_url_fallback(mut self, env_url: Option<&str>) -> Result<Self, ConfigError> {
        if self.api_url.is_none() {
            self.api_url = env_url.map(parse_api_url).transpose()?.flatten();
        }
        Ok(self)
    }
}

/// Blank means unset; anything else must be an http(s) URL.
fn parse_api_url(raw: &str) -> Result<Option<String>, ConfigError> {
    let url = raw.trim();
    if url.is_empty() {
        return Ok(None);
    }
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(ConfigError::InvalidApiUrl(url.to_string()));
    }
    Ok(Some(url.trim_end_matches('/').to_string()))
}

fn into_credentials(section: CredentialSection) -> Result<ApiCredentials, ConfigError> {
    let credentials = ApiCredentials::new(section.key, section.secret);
    let credentials = match section.passphrase.filter(|p| !p.is_empty()) {
        Some(passphrase) => credentials.with_passphrase(passphrase),
        None => credentials,
    };
    credentials.validate()?;
    Ok(credentials)
}

/// Parse order form entries, keeping their order.
pub fn parse_order_form(entries: &[Value]) -> Result<Vec<Order>, ConfigError> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_entry(index, entry))
        .collect()
}

fn parse_entry(index: usize, entry: &Value) -> Result<Order, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidOrder {
        index,
        reason: reason.to_string(),
    };

    let Value::Mapping(map) = entry else {
        return Err(invalid("expected a mapping"));
    };

    let (product, amount) = split_entry(map).map_err(|reason| invalid(&reason))?;
    let amount = parse_amount(amount).map_err(|reason| invalid(&reason))?;

    let product_id = ProductId::parse(product)
        .map_err(|source| ConfigError::InvalidOrderValue { index, source })?;

    Order::new(product_id, amount)
        .map_err(|source| ConfigError::InvalidOrderValue { index, source })
}

/// Accepts `{asset: X, amount: N}` (or `product`/`product_id`) and `{X: N}`.
fn split_entry(map: &Mapping) -> Result<(&str, &Value), String> {
    if let Some(product) = PRODUCT_KEYS.iter().find_map(|key| map.get(*key)) {
        let product = product
            .as_str()
            .ok_or_else(|| "product must be a string".to_string())?;
        let amount = map
            .get("amount")
            .ok_or_else(|| format!("missing amount for {}", product))?;
        return Ok((product, amount));
    }

    let mut pairs = map.iter();
    match (pairs.next(), pairs.next()) {
        (Some((product, amount)), None) => {
            let product = product
                .as_str()
                .ok_or_else(|| "product must be a string".to_string())?;
            Ok((product, amount))
        }
        _ => Err("expected {asset, amount} or {PRODUCT: amount}".to_string()),
    }
}

/// Parse an amount written as a number or as text like "$1,250.50".
pub fn parse_amount(value: &Value) -> Result<Decimal, String> {
    let text = match value {
        Value::Number(n) => return number_amount(n),
        Value::String(s) => s.trim().trim_start_matches('$').replace(',', ""),
        _ => return Err("amount must be a number or a string".to_string()),
    };

    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| format!("invalid amount '{}'", text))
}

/// Integers convert exactly. Floats convert through their shortest decimal
/// form, which is only trustworthy up to `F64_DIGITS` significant digits.
fn number_amount(n: &serde_yaml::Number) -> Result<Decimal, String> {
    if let Some(i) = n.as_i64() {
        return Ok(Decimal::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Decimal::from(u));
    }

    let float = n
        .as_f64()
        .filter(|f| f.is_finite())
        .ok_or_else(|| format!("invalid amount '{}'", n))?;
    let text = float.to_string();

    if significant_digits(&text) > F64_DIGITS {
        return Err(format!(
            "amount {} has more digits than a YAML number keeps; quote it",
            text
        ));
    }

    Decimal::from_str(&text).map_err(|_| format!("invalid amount '{}'", text))
}

fn significant_digits(text: &str) -> usize {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.trim_start_matches('0').trim_end_matches('0').len()
}
