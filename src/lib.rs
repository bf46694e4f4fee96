//! # Timelock Engine
//!
//! Transaction and script construction for a UTXO ledger with segregated
//! witness outputs and absolute time-locked redemption (CheckLockTimeVerify).
//!
//! The engine builds a two-branch P2WSH locking script (a time-locked
//! single-signer path and an unconditional two-signer path) and produces
//! the witness digests, witness stacks, and wire-serialized transactions
//! needed to fund and redeem it. Three things have to line up for the result
//! to be spendable at all: the script-embedded lock value, the transaction
//! lock_time, and each input's sequence field. The assembler enforces that
//! coupling at build time instead of letting the network reject it.
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every transform is deterministic and
//!    side-effect-free; builders are plain data until finalized
//! 2. **Exact Version Pinning**: consensus-critical crypto dependencies are
//!    pinned to exact versions
//! 3. **Typed Failures**: every invariant violation is a typed error, never
//!    a silently wrong transaction
//! 4. **Injected Capabilities**: signing and ledger lookup are traits the
//!    caller supplies, so the engine stays testable with stubs
//!
//! ## Usage
//!
//! ```rust
//! use timelock_engine::TxEngine;
//! use timelock_engine::locktime::LockTimeValue;
//! use timelock_engine::signer::{KeySigner, Signer};
//!
//! let engine = TxEngine::new();
//! let primary = KeySigner::from_secret_bytes(&[0x11; 32]).unwrap();
//! let secondary = KeySigner::from_secret_bytes(&[0x22; 32]).unwrap();
//!
//! let lock = LockTimeValue::from_height(700_000).unwrap();
//! let script = engine
//!     .build_timelock_script(&primary.public_key(), &secondary.public_key(), lock)
//!     .unwrap();
//!
//! // The funding output locks to a 32-byte commitment over the script
//! let script_pubkey = engine.funding_script_pubkey(&script);
//! assert_eq!(script_pubkey.len(), 34);
//! ```

pub mod commitment;
pub mod constants;
pub mod error;
pub mod locktime;
pub mod script;
pub mod scriptnum;
pub mod sighash;
pub mod signer;
pub mod transaction;
pub mod types;
pub mod witness;

// Re-export commonly used types
pub use error::{EngineError, Result};
pub use locktime::LockTimeValue;
pub use script::Script;
pub use sighash::SighashFlag;
pub use transaction::TxAssembler;
pub use types::*;

use types::{ByteString, Hash, RedemptionBranch, UnsignedTransaction, WitnessStack};

/// Facade over the construction pipeline
pub struct TxEngine;

impl TxEngine {
    pub fn new() -> Self {
        Self
    }

    /// Build the two-branch CLTV redemption script
    pub fn build_timelock_script(
        &self,
        primary_key: &[u8],
        secondary_key: &[u8],
        lock: LockTimeValue,
    ) -> Result<Script> {
        script::build_cltv_branch_script(primary_key, secondary_key, lock)
    }

    /// Commitment binding a witness script to its funding output
    pub fn script_commitment(&self, script: &Script) -> Hash {
        commitment::commitment(script)
    }

    /// Locking script `{version, commitment}` for the funding output
    pub fn funding_script_pubkey(&self, script: &Script) -> ByteString {
        commitment::witness_program(script)
    }

    /// Witness digest for one input of an unsigned transaction
    pub fn sighash(
        &self,
        tx: &UnsignedTransaction,
        input_index: usize,
        committed_script: &Script,
        committed_value: u64,
        flag: SighashFlag,
    ) -> Result<Hash> {
        sighash::sighash(tx, input_index, committed_script, committed_value, flag)
    }

    /// Witness stack for a chosen redemption branch
    pub fn assemble_witness(
        &self,
        branch: RedemptionBranch,
        primary_signature: &[u8],
        secondary_signature: Option<&[u8]>,
        witness_script: &Script,
    ) -> Result<WitnessStack> {
        witness::assemble(branch, primary_signature, secondary_signature, witness_script)
    }

    /// Wire-serialize a signed transaction to the witness-flagged form
    pub fn serialize(&self, tx: &SignedTransaction) -> Result<ByteString> {
        transaction::serialize(tx)
    }

    /// Parse witness-flagged wire bytes back into a transaction
    pub fn deserialize(&self, bytes: &[u8]) -> Result<SignedTransaction> {
        transaction::deserialize(bytes)
    }
}

impl Default for TxEngine {
    fn default() -> Self {
        Self::new()
    }
}
