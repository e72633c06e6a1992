use async_trait::async_trait;
use bitcoin::{Address, Txid};

use crate::{error::Result, UnspentOutput};

/// The slice of the explorer HTTP API the bridge depends on.
///
/// Implementations live in backend crates; errors they produce surface
/// through [`Error::Backend`](crate::Error::Backend). Every method is a
/// single request/response exchange with no retry.
#[async_trait]
pub trait ExplorerBackend: Send + Sync {
    /// Unspent outputs currently credited to `address`, in explorer order.
    async fn unspent_outputs(&self, address: &Address) -> Result<Vec<UnspentOutput>>;

    /// Address of the first input of the transaction `txid`.
    ///
    /// Used to attribute inbound funds for bookkeeping; see
    /// [`InboundTransaction::source_address`](crate::InboundTransaction).
    async fn source_address(&self, txid: Txid) -> Result<String>;

    /// Relay a hex-encoded raw transaction to the network.
    ///
    /// Returns the explorer's acknowledgment, expected to be the accepted
    /// transaction's hash.
    async fn send_raw_transaction(&self, tx_hex: String) -> Result<String>;
}
