//! Transaction assembly and segwit wire serialization
//!
//! The assembler owns the field-level invariants between lock_time, input
//! sequence, and the redemption branch a committed script allows. The checks
//! run at witness-attach time, mirroring what the ledger validator enforces
//! at acceptance time, so an unsatisfiable transaction fails here instead of
//! after broadcast.

use crate::commitment;
use crate::constants::{SEGWIT_FLAG, SEGWIT_MARKER, SEQUENCE_FINAL, TX_VERSION};
use crate::error::{EngineError, Result};
use crate::locktime::LockTimeValue;
use crate::script::Script;
use crate::sighash::{self, SighashFlag};
use crate::types::{
    ByteString, Hash, Outpoint, Output, SignedTransaction, UnpopulatedInput, UnsignedInput,
    UnsignedTransaction, Utxo, UtxoSet, WitnessStack,
};

/// Ledger query surface: resolve the funding output behind an outpoint.
/// Injected so builders stay pure and testable against a stub.
pub trait UtxoLookup {
    fn lookup(&self, outpoint: &Outpoint) -> Option<Utxo>;
}

impl UtxoLookup for UtxoSet {
    fn lookup(&self, outpoint: &Outpoint) -> Option<Utxo> {
        self.get(outpoint).cloned()
    }
}

/// Resolve an outpoint and bind the witness script the spender knows
/// out-of-band to it.
///
/// A failed lookup is a hard build failure, never a zero-filled guess, and
/// the witness script must match the funding output's commitment before it
/// is accepted as the input's committed script.
pub fn populate_input(
    outpoint: Outpoint,
    sequence: u32,
    witness_script: Script,
    ledger: &impl UtxoLookup,
) -> Result<UnsignedInput> {
    let utxo = ledger.lookup(&outpoint).ok_or_else(|| {
        EngineError::LookupFailure(format!(
            "outpoint {}:{} not found",
            hex(&outpoint.txid),
            outpoint.vout
        ))
    })?;

    let expected = commitment::parse_witness_program(&utxo.script_pubkey)?;
    commitment::verify(&witness_script.to_bytes(), &expected)?;

    Ok(UnsignedInput {
        outpoint,
        sequence,
        committed_script: witness_script,
        committed_value: utxo.value,
    })
}

/// Builds the unsigned skeleton, then accepts witness stacks input by input.
/// Pure data until `finalize`; a failing signer leaves it reusable.
#[derive(Debug, Clone)]
pub struct TxAssembler {
    version: u32,
    inputs: Vec<UnsignedInput>,
    outputs: Vec<Output>,
    lock_time: Option<u32>,
    witnesses: Vec<Option<WitnessStack>>,
}

impl TxAssembler {
    pub fn new(inputs: Vec<UnsignedInput>, outputs: Vec<Output>) -> Self {
        let witnesses = vec![None; inputs.len()];
        TxAssembler {
            version: TX_VERSION,
            inputs,
            outputs,
            lock_time: None,
            witnesses,
        }
    }

    /// Set the transaction-level lock time. Must happen before any digest is
    /// computed for a time-locked branch; digests over an inconsistent
    /// lock_time/sequence pairing verify nowhere.
    pub fn set_lock_time(&mut self, lock: LockTimeValue) {
        self.lock_time = Some(lock.encode());
    }

    pub fn set_input_sequence(&mut self, index: usize, sequence: u32) -> Result<()> {
        let input = self.input_mut(index)?;
        input.sequence = sequence;
        Ok(())
    }

    /// The unsigned view every digest is computed over
    pub fn unsigned(&self) -> UnsignedTransaction {
        UnsignedTransaction {
            version: self.version,
            inputs: self
                .inputs
                .iter()
                .map(|input| UnpopulatedInput {
                    outpoint: input.outpoint.clone(),
                    sequence: input.sequence,
                })
                .collect(),
            outputs: self.outputs.clone(),
            lock_time: self.lock_time.unwrap_or(0),
        }
    }

    /// Witness digest for one input, over its committed script and value.
    ///
    /// For a script containing OP_CLTV the lock time must already be set:
    /// a digest over the zero default would sign a transaction the script
    /// can never satisfy, so that call fails instead.
    pub fn digest(&self, index: usize, flag: SighashFlag) -> Result<Hash> {
        let input = self.input(index)?;
        if input.committed_script.requires_lock_time() && self.lock_time.is_none() {
            return Err(EngineError::InconsistentLockTime(format!(
                "input {} script requires a lock time but none is set",
                index
            )));
        }
        sighash::sighash(
            &self.unsigned(),
            index,
            &input.committed_script,
            input.committed_value,
            flag,
        )
    }

    /// Attach a witness stack to an input, enforcing the invariants that
    /// would otherwise surface as a network rejection:
    ///
    /// - the presented witness script must hash to the input's commitment
    /// - a script containing OP_CLTV requires lock_time to be set and the
    ///   input sequence to be below the final marker, otherwise the opcode
    ///   is unsatisfiable
    pub fn attach_witness(&mut self, index: usize, stack: WitnessStack) -> Result<()> {
        let input = self.input(index)?;

        let script_bytes = stack.last().ok_or_else(|| {
            EngineError::Serialization("witness stack has no script element".to_string())
        })?;
        let expected = commitment::commitment(&input.committed_script);
        commitment::verify(script_bytes, &expected)?;

        let witness_script = Script::from_bytes(script_bytes)?;
        if witness_script.requires_lock_time() {
            if self.lock_time.is_none() {
                return Err(EngineError::InconsistentLockTime(format!(
                    "input {} script requires a lock time but none is set",
                    index
                )));
            }
            if input.sequence == SEQUENCE_FINAL {
                return Err(EngineError::InconsistentLockTime(format!(
                    "input {} sequence 0x{:08x} disables lock time enforcement",
                    index, SEQUENCE_FINAL
                )));
            }
        }

        self.witnesses[index] = Some(stack);
        Ok(())
    }

    /// Seal the transaction. Every input must carry a witness stack.
    pub fn finalize(self) -> Result<SignedTransaction> {
        let transaction = self.unsigned();
        let mut witnesses = Vec::with_capacity(self.witnesses.len());
        for (i, witness) in self.witnesses.into_iter().enumerate() {
            witnesses.push(witness.ok_or_else(|| {
                EngineError::Serialization(format!("input {} has no witness attached", i))
            })?);
        }
        Ok(SignedTransaction {
            transaction,
            witnesses,
        })
    }

    fn input(&self, index: usize) -> Result<&UnsignedInput> {
        self.inputs.get(index).ok_or_else(|| {
            EngineError::Serialization(format!(
                "input index {} out of range ({} inputs)",
                index,
                self.inputs.len()
            ))
        })
    }

    fn input_mut(&mut self, index: usize) -> Result<&mut UnsignedInput> {
        let len = self.inputs.len();
        self.inputs.get_mut(index).ok_or_else(|| {
            EngineError::Serialization(format!(
                "input index {} out of range ({} inputs)",
                index, len
            ))
        })
    }
}

/// Serialize to the witness-flagged wire form: version, marker/flag pair,
/// inputs with empty scriptSigs, outputs, per-input witness stacks in input
/// order, lock time trailer. Byte-exact; downstream validators reproduce the
/// digest from these bytes with no leniency.
///
/// The wire form carries exactly one witness stack per input, so a
/// hand-built transaction with mismatched counts is rejected rather than
/// emitted as bytes that parse into something else.
pub fn serialize(tx: &SignedTransaction) -> Result<ByteString> {
    if tx.witnesses.len() != tx.transaction.inputs.len() {
        return Err(EngineError::Serialization(format!(
            "{} witness stacks for {} inputs",
            tx.witnesses.len(),
            tx.transaction.inputs.len()
        )));
    }

    let mut bytes = Vec::new();
    bytes.extend_from_slice(&tx.transaction.version.to_le_bytes());
    bytes.push(SEGWIT_MARKER);
    bytes.push(SEGWIT_FLAG);

    bytes.extend_from_slice(&encode_varint(tx.transaction.inputs.len() as u64));
    for input in &tx.transaction.inputs {
        bytes.extend_from_slice(&input.outpoint.txid);
        bytes.extend_from_slice(&input.outpoint.vout.to_le_bytes());
        // Witness inputs carry an empty legacy scriptSig
        bytes.extend_from_slice(&encode_varint(0));
        bytes.extend_from_slice(&input.sequence.to_le_bytes());
    }

    bytes.extend_from_slice(&encode_varint(tx.transaction.outputs.len() as u64));
    for output in &tx.transaction.outputs {
        bytes.extend_from_slice(&output.value.to_le_bytes());
        bytes.extend_from_slice(&encode_varint(output.script_pubkey.len() as u64));
        bytes.extend_from_slice(&output.script_pubkey);
    }

    for stack in &tx.witnesses {
        bytes.extend_from_slice(&encode_varint(stack.len() as u64));
        for element in stack {
            bytes.extend_from_slice(&encode_varint(element.len() as u64));
            bytes.extend_from_slice(element);
        }
    }

    bytes.extend_from_slice(&tx.transaction.lock_time.to_le_bytes());
    Ok(bytes)
}

/// Parse witness-flagged wire bytes back into a `SignedTransaction`
pub fn deserialize(bytes: &[u8]) -> Result<SignedTransaction> {
    let mut reader = Reader::new(bytes);

    let version = reader.read_u32()?;
    if reader.read_u8()? != SEGWIT_MARKER || reader.read_u8()? != SEGWIT_FLAG {
        return Err(EngineError::Serialization(
            "missing segwit marker/flag pair".to_string(),
        ));
    }

    let input_count = reader.read_count()?;
    let mut inputs = Vec::with_capacity(input_count);
    for _ in 0..input_count {
        let txid = reader.read_hash()?;
        let vout = reader.read_u32()?;
        let script_sig_len = reader.read_varint()? as usize;
        if script_sig_len != 0 {
            return Err(EngineError::Serialization(
                "witness input carries a non-empty scriptSig".to_string(),
            ));
        }
        let sequence = reader.read_u32()?;
        inputs.push(UnpopulatedInput {
            outpoint: Outpoint { txid, vout },
            sequence,
        });
    }

    let output_count = reader.read_count()?;
    let mut outputs = Vec::with_capacity(output_count);
    for _ in 0..output_count {
        let value = reader.read_u64()?;
        let script_len = reader.read_count()?;
        let script_pubkey = reader.read_bytes(script_len)?;
        outputs.push(Output {
            value,
            script_pubkey,
        });
    }

    let mut witnesses = Vec::with_capacity(input_count);
    for _ in 0..input_count {
        let element_count = reader.read_count()?;
        let mut stack = Vec::with_capacity(element_count);
        for _ in 0..element_count {
            let len = reader.read_count()?;
            stack.push(reader.read_bytes(len)?);
        }
        witnesses.push(stack);
    }

    let lock_time = reader.read_u32()?;
    reader.expect_end()?;

    Ok(SignedTransaction {
        transaction: UnsignedTransaction {
            version,
            inputs,
            outputs,
            lock_time,
        },
        witnesses,
    })
}

/// Variable-length integer encoding used throughout the wire format
pub(crate) fn encode_varint(value: u64) -> ByteString {
    match value {
        0..=0xfc => vec![value as u8],
        0xfd..=0xffff => {
            let mut bytes = vec![0xfd];
            bytes.extend_from_slice(&(value as u16).to_le_bytes());
            bytes
        }
        0x10000..=0xffff_ffff => {
            let mut bytes = vec![0xfe];
            bytes.extend_from_slice(&(value as u32).to_le_bytes());
            bytes
        }
        _ => {
            let mut bytes = vec![0xff];
            bytes.extend_from_slice(&value.to_le_bytes());
            bytes
        }
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn read_bytes(&mut self, len: usize) -> Result<ByteString> {
        if len > self.remaining() {
            return Err(EngineError::Serialization(format!(
                "truncated at offset {}: wanted {} bytes, {} remain",
                self.pos,
                len,
                self.remaining()
            )));
        }
        let slice = self.bytes[self.pos..self.pos + len].to_vec();
        self.pos += len;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_u64(&mut self) -> Result<u64> {
        let bytes = self.read_bytes(8)?;
        let mut array = [0u8; 8];
        array.copy_from_slice(&bytes);
        Ok(u64::from_le_bytes(array))
    }

    fn read_hash(&mut self) -> Result<Hash> {
        let bytes = self.read_bytes(32)?;
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes);
        Ok(hash)
    }

    /// A varint used as a count or length. Wire counts can never exceed the
    /// bytes left to read, so anything larger is rejected before it sizes an
    /// allocation.
    fn read_count(&mut self) -> Result<usize> {
        let value = self.read_varint()?;
        if value > self.remaining() as u64 {
            return Err(EngineError::Serialization(format!(
                "count {} exceeds {} remaining bytes",
                value,
                self.remaining()
            )));
        }
        Ok(value as usize)
    }

    fn read_varint(&mut self) -> Result<u64> {
        match self.read_u8()? {
            0xfd => {
                let bytes = self.read_bytes(2)?;
                Ok(u16::from_le_bytes([bytes[0], bytes[1]]) as u64)
            }
            0xfe => Ok(self.read_u32()? as u64),
            0xff => self.read_u64(),
            byte => Ok(byte as u64),
        }
    }

    fn expect_end(&self) -> Result<()> {
        if self.pos != self.bytes.len() {
            return Err(EngineError::Serialization(format!(
                "{} trailing bytes after lock time",
                self.bytes.len() - self.pos
            )));
        }
        Ok(())
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SEQUENCE_ENABLE_LOCKTIME;
    use crate::script::build_cltv_branch_script;
    use crate::types::RedemptionBranch;
    use crate::witness;

    fn keys() -> (Vec<u8>, Vec<u8>) {
        let mut primary = vec![0x02];
        primary.extend_from_slice(&[0x11; 32]);
        let mut secondary = vec![0x03];
        secondary.extend_from_slice(&[0x22; 32]);
        (primary, secondary)
    }

    fn test_script() -> Script {
        let (primary, secondary) = keys();
        build_cltv_branch_script(&primary, &secondary, LockTimeValue::BlockHeight(700)).unwrap()
    }

    fn test_input(sequence: u32) -> UnsignedInput {
        UnsignedInput {
            outpoint: Outpoint {
                txid: [0xaa; 32],
                vout: 1,
            },
            sequence,
            committed_script: test_script(),
            committed_value: 100_000,
        }
    }

    fn test_output() -> Output {
        Output {
            value: 90_000,
            script_pubkey: vec![0x00, 0x14, 0x01, 0x02],
        }
    }

    #[test]
    fn test_varint_encoding() {
        assert_eq!(encode_varint(0), vec![0x00]);
        assert_eq!(encode_varint(0xfc), vec![0xfc]);
        assert_eq!(encode_varint(0xfd), vec![0xfd, 0xfd, 0x00]);
        assert_eq!(encode_varint(0xffff), vec![0xfd, 0xff, 0xff]);
        assert_eq!(encode_varint(0x10000), vec![0xfe, 0x00, 0x00, 0x01, 0x00]);
    }

    #[test]
    fn test_varint_roundtrip() {
        for value in [0u64, 1, 0xfc, 0xfd, 0xffff, 0x10000, 0xffff_ffff, u64::MAX] {
            let bytes = encode_varint(value);
            let mut reader = Reader::new(&bytes);
            assert_eq!(reader.read_varint().unwrap(), value);
            assert!(reader.expect_end().is_ok());
        }
    }

    #[test]
    fn test_attach_witness_requires_lock_time_set() {
        let mut assembler = TxAssembler::new(
            vec![test_input(SEQUENCE_ENABLE_LOCKTIME)],
            vec![test_output()],
        );
        let stack = witness::assemble(RedemptionBranch::TimeLocked, &[0x30], None, &test_script()).unwrap();
        assert!(matches!(
            assembler.attach_witness(0, stack),
            Err(EngineError::InconsistentLockTime(_))
        ));
    }

    #[test]
    fn test_attach_witness_rejects_final_sequence() {
        let mut assembler =
            TxAssembler::new(vec![test_input(SEQUENCE_FINAL)], vec![test_output()]);
        assembler.set_lock_time(LockTimeValue::BlockHeight(700));
        let stack = witness::assemble(RedemptionBranch::TimeLocked, &[0x30], None, &test_script()).unwrap();
        assert!(matches!(
            assembler.attach_witness(0, stack),
            Err(EngineError::InconsistentLockTime(_))
        ));
    }

    #[test]
    fn test_attach_witness_accepts_final_but_one() {
        let mut assembler = TxAssembler::new(
            vec![test_input(SEQUENCE_ENABLE_LOCKTIME)],
            vec![test_output()],
        );
        assembler.set_lock_time(LockTimeValue::BlockHeight(700));
        let stack = witness::assemble(RedemptionBranch::TimeLocked, &[0x30], None, &test_script()).unwrap();
        assert!(assembler.attach_witness(0, stack).is_ok());
    }

    #[test]
    fn test_attach_witness_rejects_wrong_script() {
        let mut assembler = TxAssembler::new(
            vec![test_input(SEQUENCE_ENABLE_LOCKTIME)],
            vec![test_output()],
        );
        assembler.set_lock_time(LockTimeValue::BlockHeight(700));

        let (primary, secondary) = keys();
        let other =
            build_cltv_branch_script(&primary, &secondary, LockTimeValue::BlockHeight(701))
                .unwrap();
        let stack = witness::assemble(RedemptionBranch::TimeLocked, &[0x30], None, &other).unwrap();
        assert!(matches!(
            assembler.attach_witness(0, stack),
            Err(EngineError::CommitmentMismatch(_))
        ));
    }

    #[test]
    fn test_attach_witness_rejects_empty_stack() {
        let mut assembler = TxAssembler::new(
            vec![test_input(SEQUENCE_ENABLE_LOCKTIME)],
            vec![test_output()],
        );
        assert!(assembler.attach_witness(0, vec![]).is_err());
    }

    #[test]
    fn test_finalize_requires_all_witnesses() {
        let assembler = TxAssembler::new(
            vec![test_input(SEQUENCE_ENABLE_LOCKTIME)],
            vec![test_output()],
        );
        assert!(assembler.finalize().is_err());
    }

    #[test]
    fn test_set_input_sequence() {
        let mut assembler = TxAssembler::new(
            vec![test_input(SEQUENCE_FINAL)],
            vec![test_output()],
        );
        assembler.set_input_sequence(0, SEQUENCE_ENABLE_LOCKTIME).unwrap();
        assert_eq!(assembler.unsigned().inputs[0].sequence, SEQUENCE_ENABLE_LOCKTIME);
        assert!(assembler.set_input_sequence(1, 0).is_err());
    }

    #[test]
    fn test_serialize_roundtrip() {
        let mut assembler = TxAssembler::new(
            vec![test_input(SEQUENCE_ENABLE_LOCKTIME)],
            vec![test_output()],
        );
        assembler.set_lock_time(LockTimeValue::BlockHeight(700));
        let stack = witness::assemble(
            RedemptionBranch::TimeLocked,
            &[0x30, 0x44, 0x01],
            None,
            &test_script(),
        )
        .unwrap();
        assembler.attach_witness(0, stack).unwrap();
        let signed = assembler.finalize().unwrap();

        let bytes = serialize(&signed).unwrap();
        let parsed = deserialize(&bytes).unwrap();
        assert_eq!(parsed, signed);
        assert_eq!(serialize(&parsed).unwrap(), bytes);
    }

    #[test]
    fn test_serialize_wire_layout() {
        let mut assembler = TxAssembler::new(
            vec![test_input(SEQUENCE_ENABLE_LOCKTIME)],
            vec![test_output()],
        );
        assembler.set_lock_time(LockTimeValue::BlockHeight(700));
        let stack = witness::assemble(RedemptionBranch::TimeLocked, &[0x30], None, &test_script()).unwrap();
        assembler.attach_witness(0, stack).unwrap();
        let signed = assembler.finalize().unwrap();
        let bytes = serialize(&signed).unwrap();

        // version
        assert_eq!(&bytes[0..4], &TX_VERSION.to_le_bytes());
        // marker/flag pair
        assert_eq!(bytes[4], SEGWIT_MARKER);
        assert_eq!(bytes[5], SEGWIT_FLAG);
        // one input
        assert_eq!(bytes[6], 0x01);
        // empty scriptSig after the outpoint
        assert_eq!(bytes[7 + 36], 0x00);
        // lock time trailer
        assert_eq!(&bytes[bytes.len() - 4..], &700u32.to_le_bytes());
    }

    #[test]
    fn test_deserialize_rejects_truncation() {
        let mut assembler = TxAssembler::new(
            vec![test_input(SEQUENCE_ENABLE_LOCKTIME)],
            vec![test_output()],
        );
        assembler.set_lock_time(LockTimeValue::BlockHeight(700));
        let stack = witness::assemble(RedemptionBranch::TimeLocked, &[0x30], None, &test_script()).unwrap();
        assembler.attach_witness(0, stack).unwrap();
        let bytes = serialize(&assembler.finalize().unwrap()).unwrap();

        assert!(deserialize(&bytes[..bytes.len() - 1]).is_err());
        let mut extended = bytes.clone();
        extended.push(0x00);
        assert!(deserialize(&extended).is_err());
    }

    #[test]
    fn test_digest_requires_lock_time_set() {
        let assembler = TxAssembler::new(
            vec![test_input(SEQUENCE_ENABLE_LOCKTIME)],
            vec![test_output()],
        );
        assert!(matches!(
            assembler.digest(0, SighashFlag::All),
            Err(EngineError::InconsistentLockTime(_))
        ));
    }

    #[test]
    fn test_serialize_rejects_witness_count_mismatch() {
        // Hand-built transaction: one input, no witness stacks
        let signed = SignedTransaction {
            transaction: UnsignedTransaction {
                version: TX_VERSION,
                inputs: vec![UnpopulatedInput {
                    outpoint: Outpoint {
                        txid: [0xaa; 32],
                        vout: 0,
                    },
                    sequence: SEQUENCE_FINAL,
                }],
                outputs: vec![test_output()],
                lock_time: 0,
            },
            witnesses: vec![],
        };
        assert!(matches!(
            serialize(&signed),
            Err(EngineError::Serialization(_))
        ));
    }

    #[test]
    fn test_deserialize_rejects_oversized_input_count() {
        // Input count claims u64::MAX entries in a 17-byte buffer
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&TX_VERSION.to_le_bytes());
        bytes.push(SEGWIT_MARKER);
        bytes.push(SEGWIT_FLAG);
        bytes.push(0xff);
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        assert!(matches!(
            deserialize(&bytes),
            Err(EngineError::Serialization(_))
        ));
    }

    #[test]
    fn test_deserialize_rejects_oversized_script_length() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&TX_VERSION.to_le_bytes());
        bytes.push(SEGWIT_MARKER);
        bytes.push(SEGWIT_FLAG);
        bytes.push(0x00); // no inputs
        bytes.push(0x01); // one output
        bytes.extend_from_slice(&90_000u64.to_le_bytes());
        // Output script claims 4 GiB
        bytes.push(0xfe);
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            deserialize(&bytes),
            Err(EngineError::Serialization(_))
        ));
    }

    #[test]
    fn test_deserialize_rejects_missing_marker() {
        let mut bytes = vec![0u8; 10];
        bytes[4] = 0x01; // where the marker should be
        assert!(matches!(
            deserialize(&bytes),
            Err(EngineError::Serialization(_))
        ));
    }

    #[test]
    fn test_populate_input_lookup_failure() {
        let ledger = UtxoSet::new();
        let result = populate_input(
            Outpoint {
                txid: [0xaa; 32],
                vout: 0,
            },
            SEQUENCE_ENABLE_LOCKTIME,
            test_script(),
            &ledger,
        );
        assert!(matches!(result, Err(EngineError::LookupFailure(_))));
    }

    #[test]
    fn test_populate_input_resolves_commitment_and_value() {
        let script = test_script();
        let outpoint = Outpoint {
            txid: [0xaa; 32],
            vout: 0,
        };
        let mut ledger = UtxoSet::new();
        ledger.insert(
            outpoint.clone(),
            Utxo {
                value: 250_000,
                script_pubkey: crate::commitment::witness_program(&script),
            },
        );

        let input =
            populate_input(outpoint, SEQUENCE_ENABLE_LOCKTIME, script.clone(), &ledger).unwrap();
        assert_eq!(input.committed_value, 250_000);
        assert_eq!(input.committed_script, script);
    }

    #[test]
    fn test_populate_input_rejects_foreign_script() {
        let script = test_script();
        let (primary, secondary) = keys();
        let other =
            build_cltv_branch_script(&primary, &secondary, LockTimeValue::BlockHeight(999))
                .unwrap();
        let outpoint = Outpoint {
            txid: [0xaa; 32],
            vout: 0,
        };
        let mut ledger = UtxoSet::new();
        ledger.insert(
            outpoint.clone(),
            Utxo {
                value: 250_000,
                script_pubkey: crate::commitment::witness_program(&script),
            },
        );

        let result = populate_input(outpoint, SEQUENCE_ENABLE_LOCKTIME, other, &ledger);
        assert!(matches!(result, Err(EngineError::CommitmentMismatch(_))));
    }
}
