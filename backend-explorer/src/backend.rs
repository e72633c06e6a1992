use async_trait::async_trait;
use bitcoin::{Address, Txid};
use bridge_core::{ExplorerBackend, UnspentOutput};

use crate::client::{ExplorerClient, HttpClient};
use crate::error::Error;

#[async_trait]
impl<H: HttpClient> ExplorerBackend for ExplorerClient<H> {
    async fn unspent_outputs(&self, address: &Address) -> bridge_core::Result<Vec<UnspentOutput>> {
        let unspents = self.unspents(&address.to_string()).await?;
        log::debug!("explorer returned {} unspents for {address}", unspents.len());
        Ok(unspents.into_iter().map(Into::into).collect())
    }

    async fn source_address(&self, txid: Txid) -> bridge_core::Result<String> {
        let transaction = self.transaction(txid).await?;
        let address = transaction
            .first_input_address()
            .ok_or(Error::MissingSourceAddress(txid))?;
        Ok(address.to_string())
    }

    async fn send_raw_transaction(&self, tx_hex: String) -> bridge_core::Result<String> {
        Ok(self.send_raw_transaction(tx_hex).await?)
    }
}
