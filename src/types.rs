//! Core types for transaction and witness construction

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::script::Script;

/// Hash type: 256-bit hash
pub type Hash = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// Witness stack: ordered byte strings, consumed last-pushed-first.
/// For a P2WSH spend the final element is always the witness script.
pub type WitnessStack = Vec<ByteString>;

/// Reference to a single spendable coin
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outpoint {
    pub txid: Hash,
    pub vout: u32,
}

/// Which redemption path of the branch script a spend takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedemptionBranch {
    /// One signature plus satisfaction of the embedded lock time
    TimeLocked,
    /// Two signatures, lock time ignored
    Cooperative,
}

/// A fully populated input: outpoint plus the committed data the spender
/// must know out-of-band from the funding transaction. The committed value
/// and script are never derived from the input itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedInput {
    pub outpoint: Outpoint,
    pub sequence: u32,
    pub committed_script: Script,
    pub committed_value: u64,
}

/// Input as it appears in the unsigned transaction skeleton
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnpopulatedInput {
    pub outpoint: Outpoint,
    pub sequence: u32,
}

/// Transaction output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub value: u64,
    pub script_pubkey: ByteString,
}

/// Unsigned transaction: the view all digests are computed over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    pub version: u32,
    pub inputs: Vec<UnpopulatedInput>,
    pub outputs: Vec<Output>,
    pub lock_time: u32,
}

/// Terminal artifact: unsigned transaction plus per-input witness stacks.
/// Witness inputs carry empty legacy scriptSigs. Serializes
/// deterministically to wire bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub transaction: UnsignedTransaction,
    pub witnesses: Vec<WitnessStack>,
}

/// Unspent output as resolved by the ledger query surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    pub value: u64,
    pub script_pubkey: ByteString,
}

/// UTXO set: outpoint to unspent output
pub type UtxoSet = HashMap<Outpoint, Utxo>;
