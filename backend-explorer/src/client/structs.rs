use bitcoin::{Amount, Txid};
use bridge_core::UnspentOutput;
use serde::{Deserialize, Serialize};

/// One record of the `addresses/{address}/unspents` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnspentResponse {
    pub transaction_hash: Txid,
    pub output_index: u32,
    pub value: u64,
}

impl From<UnspentResponse> for UnspentOutput {
    fn from(unspent: UnspentResponse) -> Self {
        UnspentOutput {
            txid: unspent.transaction_hash,
            vout: unspent.output_index,
            value: Amount::from_sat(unspent.value),
        }
    }
}

/// A transaction as served by `transactions/{hash}`.
///
/// Only the input addresses are of interest here; everything else the
/// explorer reports is ignored during deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub inputs: Vec<InputResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputResponse {
    pub addresses: Vec<String>,
}

impl TransactionResponse {
    /// Address of the first input, when the explorer reports one.
    pub fn first_input_address(&self) -> Option<&str> {
        self.inputs
            .first()
            .and_then(|input| input.addresses.first())
            .map(String::as_str)
    }
}
