//! Construction and signing of the gateway's transactions.
//!
//! Both gateway addresses are P2WPKH outputs of their respective keys, so
//! every spend is a BIP-143 key-path signature over outputs the gateway
//! itself funded. Destinations of withdrawals are arbitrary addresses on
//! the configured network.

use std::str::FromStr;

use bitcoin::{
    absolute::LockTime,
    hashes::Hash,
    key::CompressedPublicKey,
    secp256k1::{All, Message, Secp256k1, SecretKey},
    sighash::{EcdsaSighashType, SighashCache},
    transaction::Version,
    Address, Amount, Network, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Witness,
};

use crate::{
    error::{Error, Result},
    InboundTransaction, OutboundTransaction, UnspentOutput,
};

/// The P2WPKH address controlled by `key` on `network`.
pub(crate) fn key_address(secp: &Secp256k1<All>, key: &SecretKey, network: Network) -> Address {
    let pubkey = CompressedPublicKey(key.public_key(secp));
    Address::p2wpkh(&pubkey, network)
}

/// Build and sign a withdrawal spending every output in `unspents`.
///
/// Each payout gets one output for its declared amount; whatever remains
/// after the payouts and the fee returns to the spending key's own address
/// as a single change output. A zero-value change output is not relayable,
/// so exact-balance spends omit it.
pub(crate) fn build_withdrawal(
    secp: &Secp256k1<All>,
    unspents: &[UnspentOutput],
    payouts: &[OutboundTransaction],
    key: &SecretKey,
    network: Network,
    fee: Amount,
) -> Result<Transaction> {
    let own_script = key_address(secp, key, network).script_pubkey();

    let mut outputs = Vec::with_capacity(payouts.len() + 1);
    let mut requested = 0u64;
    for payout in payouts {
        let destination = parse_destination(&payout.address, network)?;
        requested += payout.amount.to_sat();
        outputs.push(TxOut {
            value: payout.amount,
            script_pubkey: destination.script_pubkey(),
        });
    }

    let available: u64 = unspents.iter().map(|unspent| unspent.value.to_sat()).sum();
    let required = requested + fee.to_sat();
    if available < required {
        return Err(Error::InsufficientFunds {
            available: Amount::from_sat(available),
            required: Amount::from_sat(required),
        });
    }

    let change = available - required;
    if change > 0 {
        outputs.push(TxOut {
            value: Amount::from_sat(change),
            script_pubkey: own_script.clone(),
        });
    }

    let inputs = unspents
        .iter()
        .map(|unspent| TxIn {
            previous_output: OutPoint {
                txid: unspent.txid,
                vout: unspent.vout,
            },
            script_sig: ScriptBuf::new(),
            sequence: Sequence::ENABLE_RBF_NO_LOCKTIME,
            witness: Witness::default(),
        })
        .collect();

    let mut tx = Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input: inputs,
        output: outputs,
    };

    let values: Vec<Amount> = unspents.iter().map(|unspent| unspent.value).collect();
    sign_inputs(secp, &mut tx, &own_script, &values, key)?;
    Ok(tx)
}

/// Build and sign a sweep of one inbound output into the storage address.
///
/// One input, one output: the inbound amount minus the fee. Inbound values
/// at or below the fee cannot produce a relayable output and are rejected
/// up front.
pub(crate) fn build_sweep(
    secp: &Secp256k1<All>,
    inbound: &InboundTransaction,
    receiving_key: &SecretKey,
    storage_script: ScriptBuf,
    network: Network,
    fee: Amount,
) -> Result<Transaction> {
    let payout = inbound
        .amount
        .checked_sub(fee)
        .filter(|value| *value > Amount::ZERO)
        .ok_or(Error::ValueTooSmall {
            value: inbound.amount,
            fee,
        })?;

    let receiving_script = key_address(secp, receiving_key, network).script_pubkey();

    let mut tx = Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input: vec![TxIn {
            previous_output: OutPoint {
                txid: inbound.txid,
                vout: inbound.vout,
            },
            script_sig: ScriptBuf::new(),
            sequence: Sequence::ENABLE_RBF_NO_LOCKTIME,
            witness: Witness::default(),
        }],
        output: vec![TxOut {
            value: payout,
            script_pubkey: storage_script,
        }],
    };

    sign_inputs(secp, &mut tx, &receiving_script, &[inbound.amount], receiving_key)?;
    Ok(tx)
}

fn parse_destination(address: &str, network: Network) -> Result<Address> {
    Address::from_str(address)
        .map_err(|e| Error::Address(e.to_string()))?
        .require_network(network)
        .map_err(|_| Error::WrongNetwork(address.to_string()))
}

/// Sign every input as a P2WPKH spend of `script_pubkey` with `key`.
///
/// `values` holds the spent outputs' amounts, index-aligned with the
/// transaction inputs.
fn sign_inputs(
    secp: &Secp256k1<All>,
    tx: &mut Transaction,
    script_pubkey: &ScriptBuf,
    values: &[Amount],
    key: &SecretKey,
) -> Result<()> {
    let pubkey = key.public_key(secp);

    let mut sighashes = Vec::with_capacity(tx.input.len());
    {
        let mut cache = SighashCache::new(&*tx);
        for (index, value) in values.iter().enumerate() {
            let sighash = cache
                .p2wpkh_signature_hash(index, script_pubkey, *value, EcdsaSighashType::All)
                .map_err(|e| Error::Sighash(e.to_string()))?;
            sighashes.push(sighash);
        }
    }

    for (input, sighash) in tx.input.iter_mut().zip(sighashes) {
        let message = Message::from_digest(sighash.to_byte_array());
        let signature = bitcoin::ecdsa::Signature {
            signature: secp.sign_ecdsa(&message, key),
            sighash_type: EcdsaSighashType::All,
        };
        input.witness = Witness::p2wpkh(&signature, &pubkey);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::Txid;

    fn secret(byte: u8) -> SecretKey {
        SecretKey::from_slice(&[byte; 32]).unwrap()
    }

    fn txid(byte: u8) -> Txid {
        Txid::from_slice(&[byte; 32]).unwrap()
    }

    fn unspent(byte: u8, vout: u32, sats: u64) -> UnspentOutput {
        UnspentOutput {
            txid: txid(byte),
            vout,
            value: Amount::from_sat(sats),
        }
    }

    #[test]
    fn sweep_pays_amount_minus_fee_to_storage() {
        let secp = Secp256k1::new();
        let receiving = secret(0xcd);
        let storage_script = key_address(&secp, &secret(0xab), Network::Regtest).script_pubkey();

        let inbound = InboundTransaction {
            txid: txid(0xaa),
            vout: 1,
            amount: Amount::from_sat(5_000),
            source_address: "sender".into(),
        };

        let tx = build_sweep(
            &secp,
            &inbound,
            &receiving,
            storage_script.clone(),
            Network::Regtest,
            Amount::from_sat(1_000),
        )
        .unwrap();

        assert_eq!(tx.input.len(), 1);
        assert_eq!(tx.input[0].previous_output, OutPoint { txid: txid(0xaa), vout: 1 });
        assert_eq!(tx.output.len(), 1);
        assert_eq!(tx.output[0].value, Amount::from_sat(4_000));
        assert_eq!(tx.output[0].script_pubkey, storage_script);
    }

    #[test]
    fn sweep_rejects_values_not_covering_the_fee() {
        let secp = Secp256k1::new();
        let receiving = secret(0xcd);
        let storage_script = key_address(&secp, &secret(0xab), Network::Regtest).script_pubkey();
        let fee = Amount::from_sat(1_000);

        for sats in [0, 999, 1_000] {
            let inbound = InboundTransaction {
                txid: txid(0xaa),
                vout: 0,
                amount: Amount::from_sat(sats),
                source_address: "sender".into(),
            };
            let err = build_sweep(
                &secp,
                &inbound,
                &receiving,
                storage_script.clone(),
                Network::Regtest,
                fee,
            )
            .unwrap_err();
            assert!(matches!(err, Error::ValueTooSmall { .. }), "{sats} sats");
        }
    }

    #[test]
    fn withdrawal_routes_change_back_to_the_spending_key() {
        let secp = Secp256k1::new();
        let storage = secret(0xcd);
        let own_script = key_address(&secp, &storage, Network::Regtest).script_pubkey();
        let destination = key_address(&secp, &secret(0x11), Network::Regtest);

        let unspents = [unspent(0xaa, 0, 6_000), unspent(0xbb, 2, 4_000)];
        let payouts = [OutboundTransaction {
            address: destination.to_string(),
            amount: Amount::from_sat(7_000),
        }];

        let tx = build_withdrawal(
            &secp,
            &unspents,
            &payouts,
            &storage,
            Network::Regtest,
            Amount::from_sat(1_000),
        )
        .unwrap();

        assert_eq!(tx.input.len(), 2);
        assert_eq!(tx.output.len(), 2);
        assert_eq!(tx.output[0].value, Amount::from_sat(7_000));
        assert_eq!(tx.output[0].script_pubkey, destination.script_pubkey());
        assert_eq!(tx.output[1].value, Amount::from_sat(2_000));
        assert_eq!(tx.output[1].script_pubkey, own_script);
    }

    #[test]
    fn withdrawal_omits_a_zero_change_output() {
        let secp = Secp256k1::new();
        let storage = secret(0xcd);
        let destination = key_address(&secp, &secret(0x11), Network::Regtest);

        let unspents = [unspent(0xaa, 0, 8_000)];
        let payouts = [OutboundTransaction {
            address: destination.to_string(),
            amount: Amount::from_sat(7_000),
        }];

        let tx = build_withdrawal(
            &secp,
            &unspents,
            &payouts,
            &storage,
            Network::Regtest,
            Amount::from_sat(1_000),
        )
        .unwrap();

        assert_eq!(tx.output.len(), 1);
        assert_eq!(tx.output[0].value, Amount::from_sat(7_000));
    }

    #[test]
    fn withdrawal_fails_when_inputs_do_not_cover_payouts_and_fee() {
        let secp = Secp256k1::new();
        let storage = secret(0xcd);
        let destination = key_address(&secp, &secret(0x11), Network::Regtest);

        let unspents = [unspent(0xaa, 0, 7_500)];
        let payouts = [OutboundTransaction {
            address: destination.to_string(),
            amount: Amount::from_sat(7_000),
        }];

        let err = build_withdrawal(
            &secp,
            &unspents,
            &payouts,
            &storage,
            Network::Regtest,
            Amount::from_sat(1_000),
        )
        .unwrap_err();

        match err {
            Error::InsufficientFunds {
                available,
                required,
            } => {
                assert_eq!(available, Amount::from_sat(7_500));
                assert_eq!(required, Amount::from_sat(8_000));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn withdrawal_rejects_destinations_on_another_network() {
        let secp = Secp256k1::new();
        let storage = secret(0xcd);
        let destination = key_address(&secp, &secret(0x11), Network::Bitcoin);

        let unspents = [unspent(0xaa, 0, 10_000)];
        let payouts = [OutboundTransaction {
            address: destination.to_string(),
            amount: Amount::from_sat(1_000),
        }];

        let err = build_withdrawal(
            &secp,
            &unspents,
            &payouts,
            &storage,
            Network::Regtest,
            Amount::from_sat(1_000),
        )
        .unwrap_err();
        assert!(matches!(err, Error::WrongNetwork(_)));
    }

    #[test]
    fn signed_inputs_verify_against_the_signing_key() {
        let secp = Secp256k1::new();
        let storage = secret(0xcd);
        let own_script = key_address(&secp, &storage, Network::Regtest).script_pubkey();
        let destination = key_address(&secp, &secret(0x11), Network::Regtest);

        let unspents = [unspent(0xaa, 0, 6_000), unspent(0xbb, 1, 4_000)];
        let payouts = [OutboundTransaction {
            address: destination.to_string(),
            amount: Amount::from_sat(5_000),
        }];

        let tx = build_withdrawal(
            &secp,
            &unspents,
            &payouts,
            &storage,
            Network::Regtest,
            Amount::from_sat(1_000),
        )
        .unwrap();

        let pubkey = storage.public_key(&secp);
        let mut cache = SighashCache::new(&tx);
        for (index, unspent) in unspents.iter().enumerate() {
            let witness = &tx.input[index].witness;
            assert_eq!(witness.len(), 2);
            assert_eq!(witness.nth(1).unwrap(), pubkey.serialize());

            let signature = bitcoin::ecdsa::Signature::from_slice(witness.nth(0).unwrap()).unwrap();
            assert_eq!(signature.sighash_type, EcdsaSighashType::All);

            let sighash = cache
                .p2wpkh_signature_hash(index, &own_script, unspent.value, EcdsaSighashType::All)
                .unwrap();
            let message = Message::from_digest(sighash.to_byte_array());
            secp.verify_ecdsa(&message, &signature.signature, &pubkey)
                .expect("signature must verify");
        }
    }
}
