use async_trait::async_trait;

use crate::error::Result;

/// Minimal async HTTP client trait that can be implemented with any HTTP
/// library.
///
/// The bundled [`ReqwestClient`](crate::ReqwestClient) and
/// [`UreqClient`](crate::UreqClient) implementations cover the common
/// cases; consumers can bring their own by implementing the two methods.
///
/// Implementations must treat a non-2xx response as
/// [`Error::Status`](crate::Error::Status) rather than returning its body,
/// and report connection-level failures as
/// [`Error::Transport`](crate::Error::Transport).
#[async_trait]
pub trait HttpClient: Send + Sync + Clone {
    /// Perform a GET request with optional query parameters and return the
    /// response body.
    async fn get(&self, url: &str, query_params: &[(&str, String)]) -> Result<String>;

    /// Perform a POST request with a JSON body (content-type
    /// `application/json`) and return the response body.
    async fn post_json(&self, url: &str, json_body: &str) -> Result<String>;
}
