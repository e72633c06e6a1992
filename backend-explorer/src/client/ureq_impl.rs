use std::time::Duration;

use async_trait::async_trait;

use super::http_trait::HttpClient;
use crate::error::{Error, Result};

/// Minimal HTTP client implementation using ureq.
///
/// This is a lightweight, blocking HTTP client wrapped in the async trait
/// for compatibility. Each call blocks the current thread.
#[derive(Clone)]
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    /// Create a new ureq HTTP client with default settings.
    pub fn new() -> Self {
        Self::with_timeout(30)
    }

    /// Create a new ureq HTTP client with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(timeout_secs))
                .build(),
        }
    }
}

impl Default for UreqClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for UreqClient {
    async fn get(&self, url: &str, query_params: &[(&str, String)]) -> Result<String> {
        let mut request = self.agent.get(url);

        for (key, value) in query_params {
            request = request.query(key, value);
        }

        request
            .call()
            .map_err(map_err)?
            .into_string()
            .map_err(|e| Error::ResponseBody(e.to_string()))
    }

    async fn post_json(&self, url: &str, json_body: &str) -> Result<String> {
        self.agent
            .post(url)
            .set("Content-Type", "application/json")
            .send_string(json_body)
            .map_err(map_err)?
            .into_string()
            .map_err(|e| Error::ResponseBody(e.to_string()))
    }
}

fn map_err(e: ureq::Error) -> Error {
    match e {
        ureq::Error::Status(status, response) => Error::Status {
            status,
            body: response.into_string().unwrap_or_default(),
        },
        other => Error::Transport(other.to_string()),
    }
}
