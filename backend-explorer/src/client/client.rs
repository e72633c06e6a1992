use bitcoin::Txid;
use url::Url;

use super::http_trait::HttpClient;
use super::structs::{TransactionResponse, UnspentResponse};
use crate::error::Result;

/// Client for a block-explorer REST API.
///
/// Generic over the HTTP client implementation, allowing consumers to
/// provide their own by implementing the [`HttpClient`] trait.
#[derive(Clone)]
pub struct ExplorerClient<H: HttpClient> {
    http_client: H,
    base_url: Url,
}

impl<H: HttpClient> ExplorerClient<H> {
    /// Create a new explorer client with a custom HTTP client
    /// implementation.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the explorer API
    /// * `http_client` - HTTP client implementation
    pub fn new(base_url: String, http_client: H) -> Result<Self> {
        let mut base_url = Url::parse(&base_url)?;

        // we need a trailing slash, if not present we append it
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Ok(ExplorerClient {
            http_client,
            base_url,
        })
    }

    /// Unspent outputs currently credited to `address`.
    pub async fn unspents(&self, address: &str) -> Result<Vec<UnspentResponse>> {
        let url = self
            .base_url
            .join(&format!("addresses/{}/unspents", address))?;
        let body = self.http_client.get(url.as_str(), &[]).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// The transaction `txid`, reduced to its inputs and their addresses.
    pub async fn transaction(&self, txid: Txid) -> Result<TransactionResponse> {
        let url = self.base_url.join(&format!("transactions/{}", txid))?;
        let body = self.http_client.get(url.as_str(), &[]).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Relay a hex-encoded raw transaction.
    ///
    /// The request body is the hex string as a JSON string literal; the
    /// response is the accepted transaction's reference, also a JSON
    /// string.
    pub async fn send_raw_transaction(&self, tx_hex: String) -> Result<String> {
        let url = self.base_url.join("sendrawtransaction")?;
        let json_body = serde_json::to_string(&tx_hex)?;
        let body = self.http_client.post_json(url.as_str(), &json_body).await?;
        Ok(serde_json::from_str(&body)?)
    }
}
