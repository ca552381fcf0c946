use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },
    #[error("JSON parsing failed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Thin JSON-over-HTTP wrapper: one attempt per call, non-2xx statuses and
/// undecodable bodies are errors.
#[derive(Debug, Clone)]
pub struct JsonHttpClient {
    client: Client,
}

impl JsonHttpClient {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("early-buyers/0.1")
            .build()?;

        Ok(Self { client })
    }

    /// GET `url` with query parameters and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, TransportError> {
        let request = self.client.get(url).query(query);
        self.execute(request).await
    }

    /// POST a JSON body to `url` with query parameters and decode the JSON response
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> Result<T, TransportError> {
        let request = self.client.post(url).query(query).json(body);
        self.execute(request).await
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, TransportError> {
        // URLs may carry an api-key query parameter, keep them out of errors
        let response = request.send().await.map_err(|e| e.without_url())?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("HTTP {} from upstream: {}", status, message);
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(|e| e.without_url())?;
        debug!("Received {} bytes", body.len());

        serde_json::from_str(&body).map_err(|e| {
            let sample: String = body.chars().take(500).collect();
            error!("Failed to decode response body: {} (first bytes: {})", e, sample);
            TransportError::Decode(e)
        })
    }
}
