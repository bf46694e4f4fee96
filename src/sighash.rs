//! SegWit signature hash (BIP143-style digest)
//!
//! The witness digest replaces the legacy whole-transaction hash with a fixed
//! preimage built from intermediate double-SHA256 hashes. Signature cost is
//! O(1) per input regardless of transaction size, and the spent value is
//! bound into the digest, which closes the fee-theft window that exists when
//! a signer cannot see what amount it is committing.

use bitcoin_hashes::{sha256d, Hash as BitcoinHash, HashEngine};
use serde::{Deserialize, Serialize};

use crate::constants::SIGHASH_ALL;
use crate::error::{EngineError, Result};
use crate::script::Script;
use crate::transaction::encode_varint;
use crate::types::{ByteString, Hash, UnsignedTransaction};

/// Which subset of the transaction a signature commits to.
///
/// Only `All` is computable today; the other flags exist so the digest
/// surface keeps the protocol's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SighashFlag {
    All,
    None,
    Single,
    AllAnyoneCanPay,
    NoneAnyoneCanPay,
    SingleAnyoneCanPay,
}

impl SighashFlag {
    /// The flag byte appended to signatures and committed in the preimage
    pub fn to_byte(self) -> u8 {
        match self {
            SighashFlag::All => SIGHASH_ALL,
            SighashFlag::None => 0x02,
            SighashFlag::Single => 0x03,
            SighashFlag::AllAnyoneCanPay => 0x81,
            SighashFlag::NoneAnyoneCanPay => 0x82,
            SighashFlag::SingleAnyoneCanPay => 0x83,
        }
    }
}

/// Double SHA-256
fn hash256(data: &[u8]) -> Hash {
    let mut engine = sha256d::Hash::engine();
    engine.input(data);
    let result = sha256d::Hash::from_engine(engine);
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// hashPrevouts: double SHA-256 over all input outpoints
fn hash_prevouts(tx: &UnsignedTransaction) -> Hash {
    let mut data = Vec::new();
    for input in &tx.inputs {
        data.extend_from_slice(&input.outpoint.txid);
        data.extend_from_slice(&input.outpoint.vout.to_le_bytes());
    }
    hash256(&data)
}

/// hashSequence: double SHA-256 over all input sequence fields
fn hash_sequence(tx: &UnsignedTransaction) -> Hash {
    let mut data = Vec::new();
    for input in &tx.inputs {
        data.extend_from_slice(&input.sequence.to_le_bytes());
    }
    hash256(&data)
}

/// hashOutputs: double SHA-256 over all serialized outputs
fn hash_outputs(tx: &UnsignedTransaction) -> Hash {
    let mut data = Vec::new();
    for output in &tx.outputs {
        data.extend_from_slice(&output.value.to_le_bytes());
        data.extend_from_slice(&encode_varint(output.script_pubkey.len() as u64));
        data.extend_from_slice(&output.script_pubkey);
    }
    hash256(&data)
}

/// Compute the witness digest for one input.
///
/// The committed script and value come from the funding output and must be
/// supplied out-of-band; a wrong value here yields a signature that looks
/// fine and verifies against nothing.
pub fn sighash(
    tx: &UnsignedTransaction,
    input_index: usize,
    committed_script: &Script,
    committed_value: u64,
    flag: SighashFlag,
) -> Result<Hash> {
    if flag != SighashFlag::All {
        return Err(EngineError::UnsupportedSighashFlag(format!(
            "{:?} (only All is supported)",
            flag
        )));
    }
    let input = tx.inputs.get(input_index).ok_or_else(|| {
        EngineError::Serialization(format!(
            "input index {} out of range ({} inputs)",
            input_index,
            tx.inputs.len()
        ))
    })?;

    let script_code = committed_script.to_bytes();

    let mut preimage = Vec::new();
    preimage.extend_from_slice(&tx.version.to_le_bytes());
    preimage.extend_from_slice(&hash_prevouts(tx));
    preimage.extend_from_slice(&hash_sequence(tx));
    preimage.extend_from_slice(&input.outpoint.txid);
    preimage.extend_from_slice(&input.outpoint.vout.to_le_bytes());
    preimage.extend_from_slice(&encode_varint(script_code.len() as u64));
    preimage.extend_from_slice(&script_code);
    preimage.extend_from_slice(&committed_value.to_le_bytes());
    preimage.extend_from_slice(&input.sequence.to_le_bytes());
    preimage.extend_from_slice(&hash_outputs(tx));
    preimage.extend_from_slice(&tx.lock_time.to_le_bytes());
    preimage.extend_from_slice(&(flag.to_byte() as u32).to_le_bytes());

    Ok(hash256(&preimage))
}

/// Append the flag byte to a DER signature, producing the witness element
/// form validators expect
pub fn encode_signature(der: &[u8], flag: SighashFlag) -> ByteString {
    let mut sig = der.to_vec();
    sig.push(flag.to_byte());
    sig
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{SEQUENCE_ENABLE_LOCKTIME, TX_VERSION};
    use crate::locktime::LockTimeValue;
    use crate::script::build_cltv_branch_script;
    use crate::types::{Outpoint, Output, UnpopulatedInput};

    fn test_script() -> Script {
        let mut primary = vec![0x02];
        primary.extend_from_slice(&[0x11; 32]);
        let mut secondary = vec![0x03];
        secondary.extend_from_slice(&[0x22; 32]);
        build_cltv_branch_script(&primary, &secondary, LockTimeValue::BlockHeight(700)).unwrap()
    }

    fn test_tx() -> UnsignedTransaction {
        UnsignedTransaction {
            version: TX_VERSION,
            inputs: vec![UnpopulatedInput {
                outpoint: Outpoint {
                    txid: [0xaa; 32],
                    vout: 1,
                },
                sequence: SEQUENCE_ENABLE_LOCKTIME,
            }],
            outputs: vec![Output {
                value: 90_000,
                script_pubkey: vec![0x00, 0x14, 0x01, 0x02],
            }],
            lock_time: 700,
        }
    }

    #[test]
    fn test_sighash_deterministic() {
        let tx = test_tx();
        let script = test_script();
        let a = sighash(&tx, 0, &script, 100_000, SighashFlag::All).unwrap();
        let b = sighash(&tx, 0, &script, 100_000, SighashFlag::All).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sighash_binds_value() {
        let tx = test_tx();
        let script = test_script();
        let a = sighash(&tx, 0, &script, 100_000, SighashFlag::All).unwrap();
        let b = sighash(&tx, 0, &script, 100_001, SighashFlag::All).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_sighash_binds_script() {
        let tx = test_tx();
        let script = test_script();
        let mut primary = vec![0x02];
        primary.extend_from_slice(&[0x33; 32]);
        let mut secondary = vec![0x03];
        secondary.extend_from_slice(&[0x22; 32]);
        let other =
            build_cltv_branch_script(&primary, &secondary, LockTimeValue::BlockHeight(700))
                .unwrap();

        let a = sighash(&tx, 0, &script, 100_000, SighashFlag::All).unwrap();
        let b = sighash(&tx, 0, &other, 100_000, SighashFlag::All).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_sighash_binds_lock_time() {
        let mut tx = test_tx();
        let script = test_script();
        let a = sighash(&tx, 0, &script, 100_000, SighashFlag::All).unwrap();
        tx.lock_time = 701;
        let b = sighash(&tx, 0, &script, 100_000, SighashFlag::All).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_unsupported_flags_rejected() {
        let tx = test_tx();
        let script = test_script();
        for flag in [
            SighashFlag::None,
            SighashFlag::Single,
            SighashFlag::AllAnyoneCanPay,
            SighashFlag::NoneAnyoneCanPay,
            SighashFlag::SingleAnyoneCanPay,
        ] {
            assert!(matches!(
                sighash(&tx, 0, &script, 100_000, flag),
                Err(EngineError::UnsupportedSighashFlag(_))
            ));
        }
    }

    #[test]
    fn test_input_index_out_of_range() {
        let tx = test_tx();
        let script = test_script();
        assert!(sighash(&tx, 1, &script, 100_000, SighashFlag::All).is_err());
    }

    #[test]
    fn test_encode_signature_appends_flag() {
        let der = vec![0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01];
        let sig = encode_signature(&der, SighashFlag::All);
        assert_eq!(sig.len(), der.len() + 1);
        assert_eq!(*sig.last().unwrap(), SIGHASH_ALL);
        assert_eq!(&sig[..der.len()], &der[..]);
    }
}
