use std::time::Duration;

use async_trait::async_trait;

use super::http_trait::HttpClient;
use crate::error::{Error, Result};

/// Async HTTP client implementation using reqwest.
///
/// This is a fully async HTTP client built on top of tokio/hyper. It is
/// the bundled default; enable the `ureq-client` feature instead for a
/// minimal blocking client without an async runtime.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Create a new reqwest HTTP client with default settings.
    pub fn new() -> Self {
        Self::with_timeout(30)
    }

    /// Create a new reqwest HTTP client with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .expect("Failed to build reqwest client"),
        }
    }

    /// Create a new reqwest HTTP client with a custom client configuration.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str, query_params: &[(&str, String)]) -> Result<String> {
        let mut request = self.client.get(url);

        for (key, value) in query_params {
            request = request.query(&[(key, value)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        read_body(response).await
    }

    async fn post_json(&self, url: &str, json_body: &str) -> Result<String> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(json_body.to_string())
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        read_body(response).await
    }
}

async fn read_body(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::ResponseBody(e.to_string()))?;

    if !status.is_success() {
        return Err(Error::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}
