//! Generic REST client wrapper around reqwest.

use crate::error::RestError;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Generic REST client for making HTTP requests.
pub struct RestClient {
    client: Client,
    base_url: String,
}

impl RestClient {
    /// Create a new REST client with the given base URL.
    ///
    /// # Arguments
    /// * `base_url` - Base URL for all requests (e.g., "https://api.coinbase.com")
    /// * `timeout` - Request timeout duration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RestError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RestError::RequestBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request.
    ///
    /// # Arguments
    /// * `path` - Request path (e.g., "/api/v3/brokerage/orders/historical/abc")
    /// * `headers` - Additional headers, e.g. authentication
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        headers: &[(&str, String)],
    ) -> Result<T, RestError> {
        let url = self.build_url(path);
        tracing::debug!(url = %url, "GET request");

        let request = with_headers(self.client.get(&url), headers);
        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Make a POST request with a JSON body.
    ///
    /// The body is sent byte-for-byte as given so it matches what was signed.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: String,
        headers: &[(&str, String)],
    ) -> Result<T, RestError> {
        let url = self.build_url(path);
        tracing::debug!(url = %url, body_len = body.len(), "POST request");

        let request = with_headers(self.client.post(&url), headers)
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Build a full URL from a path.
    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Handle HTTP response and deserialize JSON body.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, RestError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                tracing::warn!(body = %body, error = %e, "Failed to parse response");
                RestError::Parse(e.to_string())
            })
        } else {
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(RestError::RateLimited(error_message(&body)));
            }

            Err(RestError::HttpError {
                status: status.as_u16(),
                message: error_message(&body),
            })
        }
    }
}

fn with_headers(mut request: RequestBuilder, headers: &[(&str, String)]) -> RequestBuilder {
    for (key, value) in headers {
        request = request.header(*key, value.as_str());
    }
    request
}

/// Pull a human-readable message out of an error body.
///
/// Looks at `message`, then `error_response.message`, then `error`; falls
/// back to the raw body.
pub(crate) fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };

    let candidates = [
        value.get("message"),
        value.get("error_response").and_then(|e| e.get("message")),
        value.get("error"),
    ];

    let message = candidates
        .into_iter()
        .flatten()
        .filter_map(|v| v.as_str())
        .find(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string());
    message
}
