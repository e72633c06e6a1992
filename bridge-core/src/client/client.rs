use bitcoin::{
    consensus::encode::serialize,
    secp256k1::{All, Secp256k1, SecretKey},
    Address, Amount, Network,
};
use futures::{stream, StreamExt, TryStreamExt};

use crate::{
    backend::ExplorerBackend,
    builder,
    error::{Error, Result},
    InboundTransaction, OutboundTransaction,
};

/// Fee paid by every transaction the gateway constructs.
pub const DEFAULT_FEE: Amount = Amount::from_sat(1_000);

/// How many funding-transaction lookups may be in flight at once while
/// attributing inbound outputs. Results are yielded in explorer order no
/// matter which request finishes first.
const CONCURRENT_SOURCE_REQUESTS: usize = 4;

/// Gateway between a custodial address pair and a blockchain explorer.
///
/// Holds a receiving key and a storage key, each mapped to one P2WPKH
/// address on the configured network. Every operation is a one-shot
/// request/response sequence over the explorer backend: there is no retry,
/// no polling, and no state kept between calls, so a client can be shared
/// freely across concurrent call sites.
pub struct BridgeClient<B: ExplorerBackend> {
    backend: B,
    receiving_key: SecretKey,
    storage_key: SecretKey,
    network: Network,
    fee: Amount,
    secp: Secp256k1<All>,
}

impl<B: ExplorerBackend> BridgeClient<B> {
    pub fn new(
        backend: B,
        receiving_key: SecretKey,
        storage_key: SecretKey,
        network: Network,
    ) -> Self {
        Self {
            backend,
            receiving_key,
            storage_key,
            network,
            fee: DEFAULT_FEE,
            secp: Secp256k1::new(),
        }
    }

    /// Override the fixed per-transaction fee. The fee applies to every
    /// transaction this client builds; it is not configurable per call.
    pub fn with_fee(mut self, fee: Amount) -> Self {
        self.fee = fee;
        self
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// The address funds are received at before being swept to storage.
    pub fn receiving_address(&self) -> Address {
        builder::key_address(&self.secp, &self.receiving_key, self.network)
    }

    /// The address swept funds accumulate at and withdrawals are paid from.
    pub fn storage_address(&self) -> Address {
        builder::key_address(&self.secp, &self.storage_key, self.network)
    }

    /// List the unspent outputs of the receiving address, each attributed
    /// to the address of its funding transaction's first input.
    ///
    /// Issues one unspents request plus one funding-transaction lookup per
    /// output. The returned list preserves the explorer's order, with
    /// output index and amount copied verbatim.
    pub async fn inbound_transactions(&self) -> Result<Vec<InboundTransaction>> {
        let address = self.receiving_address();
        let unspents = self.backend.unspent_outputs(&address).await?;
        log::debug!("{} unspent outputs at the receiving address", unspents.len());

        stream::iter(unspents)
            .map(|unspent| async move {
                let source_address = self.backend.source_address(unspent.txid).await?;
                Ok(InboundTransaction {
                    txid: unspent.txid,
                    vout: unspent.vout,
                    amount: unspent.value,
                    source_address,
                })
            })
            .buffered(CONCURRENT_SOURCE_REQUESTS)
            .try_collect()
            .await
    }

    /// Build and sign a withdrawal paying each outbound transaction from
    /// storage funds. Spends every unspent output of the storage address
    /// and routes the remainder back to it as change.
    ///
    /// Returns the serialized signed transaction without broadcasting it;
    /// submitting the result is the caller's decision via [`broadcast`].
    ///
    /// [`broadcast`]: BridgeClient::broadcast
    pub async fn issue_withdrawal(&self, payouts: &[OutboundTransaction]) -> Result<Vec<u8>> {
        let address = self.storage_address();
        let unspents = self.backend.unspent_outputs(&address).await?;

        let tx = builder::build_withdrawal(
            &self.secp,
            &unspents,
            payouts,
            &self.storage_key,
            self.network,
            self.fee,
        )?;
        log::info!(
            "withdrawal built: {} inputs, {} outputs, txid {}",
            tx.input.len(),
            tx.output.len(),
            tx.compute_txid()
        );
        Ok(serialize(&tx))
    }

    /// Sweep one inbound output into the storage address and broadcast the
    /// result immediately.
    ///
    /// The storage address receives the inbound amount minus the fixed fee.
    /// Returns the explorer's broadcast acknowledgment.
    pub async fn move_to_storage(&self, inbound: &InboundTransaction) -> Result<String> {
        let storage_script = self.storage_address().script_pubkey();
        let tx = builder::build_sweep(
            &self.secp,
            inbound,
            &self.receiving_key,
            storage_script,
            self.network,
            self.fee,
        )?;
        self.broadcast(&serialize(&tx)).await
    }

    /// Submit a serialized transaction to the explorer's relay endpoint.
    ///
    /// An accepted broadcast is irreversible. Any failure, whether
    /// transport, status, or a malformed acknowledgment, surfaces as
    /// [`Error::Broadcast`]; no retry is attempted.
    pub async fn broadcast(&self, raw_tx: &[u8]) -> Result<String> {
        let ack = self
            .backend
            .send_raw_transaction(hex::encode(raw_tx))
            .await
            .map_err(|e| Error::Broadcast(e.to_string()))?;
        log::info!("transaction accepted by the explorer: {ack}");
        Ok(ack)
    }
}
