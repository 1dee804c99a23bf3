//! Coinbase Advanced Trade REST client.

use crate::error::CoinbaseError;
use crate::requests::CreateOrderRequest;
use crate::responses::{CreateOrderResponse, GetOrderResponse, OrderAck, OrderSnapshot};
use auth::{ApiCredentials, RequestSigner};
use common::CoinbaseEnvironment;
use rest_client::RestClient;
use rust_decimal::Decimal;
use std::time::Duration;

/// Request timeout for Coinbase API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Order endpoint path. Also the signed path for order creation.
pub const ORDERS_PATH: &str = "/api/v3/brokerage/orders";

/// Coinbase REST API client with authentication support.
///
/// Each call makes exactly one HTTP request; retry policy lives with the caller.
pub struct CoinbaseRestClient {
    client: RestClient,
    credentials: ApiCredentials,
    environment: CoinbaseEnvironment,
}

impl CoinbaseRestClient {
    /// Create a client for the given environment.
    ///
    /// # Errors
    /// Returns `CoinbaseError::Auth` if the credentials are unusable and
    /// `CoinbaseError::Rest` if the HTTP client cannot be built.
    pub fn new(
        credentials: ApiCredentials,
        environment: CoinbaseEnvironment,
    ) -> Result<Self, CoinbaseError> {
        Self::with_base_url(credentials, environment, environment.rest_base_url())
    }

    /// Create a client against an explicit base URL (proxies, local stubs).
    pub fn with_base_url(
        credentials: ApiCredentials,
        environment: CoinbaseEnvironment,
        base_url: &str,
    ) -> Result<Self, CoinbaseError> {
        credentials.validate()?;
        let client = RestClient::new(base_url, REQUEST_TIMEOUT)?;

        Ok(Self {
            client,
            credentials,
            environment,
        })
    }

    /// Place a market buy sized in quote currency.
    ///
    /// POST /api/v3/brokerage/orders
    ///
    /// # Parameters
    /// - `product_id`: Product (e.g., "BTC-USD")
    /// - `quote_size`: Amount of quote currency to spend
    /// - `client_order_id`: Idempotency token; reuse it when retrying the same order
    ///
    /// `success: false` responses come back as `CoinbaseError::Rejected`.
    pub async fn place_market_order(
        &self,
        product_id: &str,
        quote_size: Decimal,
        client_order_id: &str,
    ) -> Result<OrderAck, CoinbaseError> {
        let request =
            CreateOrderRequest::market_buy(product_id, quote_size.to_string(), client_order_id);
        let body =
            serde_json::to_string(&request).map_err(|e| CoinbaseError::Serialize(e.to_string()))?;

        let signed = RequestSigner::new(&self.credentials).sign_now("POST", ORDERS_PATH, &body);
        let headers = signed.header_pairs();

        tracing::info!(
            product_id = %product_id,
            quote_size = %quote_size,
            client_order_id = %client_order_id,
            "Placing market buy"
        );

        let response: CreateOrderResponse =
            self.client.post_json(ORDERS_PATH, body, &headers).await?;
        let ack = response.into_ack(client_order_id)?;

        tracing::info!(
            order_id = %ack.order_id,
            status = %ack.status,
            "Order placed"
        );

        Ok(ack)
    }

    /// Fetch the current state of an order.
    ///
    /// GET /api/v3/brokerage/orders/historical/{order_id}
    pub async fn get_order(&self, order_id: &str) -> Result<OrderSnapshot, CoinbaseError> {
        let path = order_path(order_id);

        let signed = RequestSigner::new(&self.credentials).sign_now("GET", &path, "");
        let headers = signed.header_pairs();

        let response: GetOrderResponse = self.client.get(&path, &headers).await?;

        tracing::debug!(
            order_id = %response.order.order_id,
            status = %response.order.status,
            "Order fetched"
        );

        Ok(response.order)
    }
}

fn order_path(order_id: &str) -> String {
    format!("{}/historical/{}", ORDERS_PATH, order_id)
}

impl std::fmt::Debug for CoinbaseRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinbaseRestClient")
            .field("environment", &self.environment)
            .field("base_url", &self.client.base_url())
            .field("api_key", &self.credentials.api_key())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::{
        AuthError, API_VERSION, HEADER_ACCESS_KEY, HEADER_ACCESS_PASSPHRASE, HEADER_ACCESS_SIGN,
        HEADER_ACCESS_TIMESTAMP, HEADER_VERSION,
    };
    use rest_client::RestError;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    #[test]
    fn test_new_rejects_empty_secret() {
        let creds = ApiCredentials::new("key".into(), "".into());
        let err = CoinbaseRestClient::new(creds, CoinbaseEnvironment::Sandbox).unwrap_err();
        assert!(matches!(err, CoinbaseError::Auth(AuthError::EmptySecret)));
    }

    #[test]
    fn test_debug_hides_secret() {
        let creds = ApiCredentials::new("my_key".into(), "top_secret".into());
        let client = CoinbaseRestClient::new(creds, CoinbaseEnvironment::Sandbox).unwrap();
        let debug = format!("{:?}", client);

        assert!(debug.contains("my_key"));
        assert!(debug.contains("https://api-sandbox.coinbase.com"));
        assert!(!debug.contains("top_secret"));
    }

    #[test]
    fn test_order_path() {
        assert_eq!(
            order_path("abc-123"),
            "/api/v3/brokerage/orders/historical/abc-123"
        );
    }

    /// What a local stub exchange saw of one request.
    struct CapturedRequest {
        method: String,
        path: String,
        headers: HashMap<String, String>,
        body: String,
    }

    impl CapturedRequest {
        fn header(&self, name: &str) -> &str {
            self.headers
                .get(&name.to_ascii_lowercase())
                .map(String::as_str)
                .unwrap_or_else(|| panic!("missing header {name}"))
        }
    }

    /// Serve exactly one HTTP request with a canned response.
    async fn serve_once(
        status_line: &'static str,
        response_body: &'static str,
    ) -> (String, JoinHandle<CapturedRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];

            let header_end = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before headers were complete");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let head = String::from_utf8(buf[..header_end].to_vec()).unwrap();
            let mut lines = head.split("\r\n");
            let mut request_line = lines.next().unwrap().split(' ');
            let method = request_line.next().unwrap().to_string();
            let path = request_line.next().unwrap().to_string();
            let headers: HashMap<String, String> = lines
                .filter_map(|line| line.split_once(':'))
                .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
                .collect();

            let content_length: usize = headers
                .get("content-length")
                .map(|v| v.parse().unwrap())
                .unwrap_or(0);
            while buf.len() < header_end + content_length {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before body was complete");
                buf.extend_from_slice(&chunk[..n]);
            }
            let body =
                String::from_utf8(buf[header_end..header_end + content_length].to_vec()).unwrap();

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\
                 connection: close\r\n\r\n{}",
                status_line,
                response_body.len(),
                response_body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;

            CapturedRequest {
                method,
                path,
                headers,
                body,
            }
        });

        (base_url, handle)
    }

    fn credentials() -> ApiCredentials {
        ApiCredentials::new("test-key".into(), "test-secret".into())
            .with_passphrase("test-pass".into())
    }

    fn client_for(base_url: &str) -> CoinbaseRestClient {
        CoinbaseRestClient::with_base_url(credentials(), CoinbaseEnvironment::Sandbox, base_url)
            .unwrap()
    }

    /// Recompute the signature the client should have sent for `request`.
    fn expected_signature(request: &CapturedRequest) -> String {
        let timestamp: i64 = request.header(HEADER_ACCESS_TIMESTAMP).parse().unwrap();
        let creds = credentials();
        RequestSigner::new(&creds)
            .sign_request(&request.method, &request.path, &request.body, timestamp)
            .signature
    }

    #[tokio::test]
    async fn test_place_market_order_sends_signed_body() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"success":true,"order_id":"ord-1","success_response":{"order_id":"ord-1"}}"#,
        )
        .await;

        let ack = client_for(&base_url)
            .place_market_order("BTC-USD", dec!(25.00), "client-1")
            .await
            .unwrap();
        let request = server.await.unwrap();

        assert_eq!(ack.order_id, "ord-1");
        assert_eq!(ack.status, "PENDING");
        assert_eq!(ack.client_order_id, "client-1");

        assert_eq!(request.method, "POST");
        assert_eq!(request.path, ORDERS_PATH);
        assert_eq!(request.header(HEADER_ACCESS_KEY), "test-key");
        assert_eq!(request.header(HEADER_ACCESS_PASSPHRASE), "test-pass");
        assert_eq!(request.header(HEADER_VERSION), API_VERSION);
        assert_eq!(request.header("content-type"), "application/json");
        assert_eq!(
            request.header(HEADER_ACCESS_SIGN),
            expected_signature(&request)
        );

        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "client_order_id": "client-1",
                "product_id": "BTC-USD",
                "side": "BUY",
                "order_configuration": {
                    "market_market_ioc": { "quote_size": "25.00" }
                }
            })
        );
    }

    #[tokio::test]
    async fn test_unsuccessful_order_is_rejected_not_rest_error() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{
                "success": false,
                "failure_reason": "UNKNOWN_FAILURE_REASON",
                "order_id": "",
                "error_response": {
                    "error": "INSUFFICIENT_FUND",
                    "message": "Insufficient balance in source account"
                }
            }"#,
        )
        .await;

        let err = client_for(&base_url)
            .place_market_order("ETH-USD", dec!(10), "client-2")
            .await
            .unwrap_err();
        server.await.unwrap();

        match err {
            CoinbaseError::Rejected { reason, message } => {
                assert_eq!(reason, "INSUFFICIENT_FUND");
                assert_eq!(message, "Insufficient balance in source account");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_success_status_is_retryable_rest_error() {
        let (base_url, server) = serve_once(
            "401 Unauthorized",
            r#"{"error":"unauthorized","message":"invalid signature"}"#,
        )
        .await;

        let err = client_for(&base_url)
            .place_market_order("BTC-USD", dec!(25), "client-3")
            .await
            .unwrap_err();
        server.await.unwrap();

        assert!(matches!(
            &err,
            CoinbaseError::Rest(RestError::HttpError { status: 401, message })
                if message == "invalid signature"
        ));
        assert!(err.is_retryable());
        assert_eq!(err.report_message(), "HTTP 401: invalid signature");
    }

    #[tokio::test]
    async fn test_rate_limit_is_retryable_rest_error() {
        let (base_url, server) =
            serve_once("429 Too Many Requests", r#"{"message":"rate limit exceeded"}"#).await;

        let err = client_for(&base_url)
            .place_market_order("BTC-USD", dec!(25), "client-4")
            .await
            .unwrap_err();
        server.await.unwrap();

        assert!(matches!(
            &err,
            CoinbaseError::Rest(RestError::RateLimited(message)) if message == "rate limit exceeded"
        ));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_get_order_is_signed_get() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"order":{
                "order_id":"ord-1",
                "product_id":"BTC-USD",
                "status":"FILLED",
                "filled_size":"0.00049",
                "filled_value":"24.85",
                "average_filled_price":"50714.28",
                "total_fees":"0.15"
            }}"#,
        )
        .await;

        let snapshot = client_for(&base_url).get_order("ord-1").await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(snapshot.status, "FILLED");
        assert_eq!(snapshot.filled_value, Some(dec!(24.85)));
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/api/v3/brokerage/orders/historical/ord-1");
        assert!(request.body.is_empty());
        assert_eq!(
            request.header(HEADER_ACCESS_SIGN),
            expected_signature(&request)
        );
    }
}
