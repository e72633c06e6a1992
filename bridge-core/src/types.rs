use bitcoin::{Amount, Txid};
use serde::{Deserialize, Serialize};

/// An unspent output held by one of the gateway addresses, as reported by
/// the explorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnspentOutput {
    pub txid: Txid,
    pub vout: u32,
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    pub value: Amount,
}

/// Funds received at the receiving address, still unspent.
///
/// `source_address` is the address of the first input of the funding
/// transaction. Bitcoin does not establish who paid for a transaction, so
/// this is advisory bookkeeping metadata, never a verified sender identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundTransaction {
    pub txid: Txid,
    pub vout: u32,
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    pub amount: Amount,
    pub source_address: String,
}

/// A payment requested out of the storage address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundTransaction {
    pub address: String,
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    pub amount: Amount,
}
