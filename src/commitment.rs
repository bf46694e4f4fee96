//! Witness script commitments
//!
//! A P2WSH output locks coins to a 32-byte SHA-256 commitment over the
//! witness script's serialized bytes. The same derivation builds the funding
//! output and verifies a candidate script at spend time; commitment equality
//! is the sole acceptance criterion.

use sha2::{Digest, Sha256};

use crate::constants::{OP_0, WITNESS_V0};
use crate::error::{EngineError, Result};
use crate::script::Script;
use crate::types::{ByteString, Hash};

/// Single-round SHA-256 commitment over the script's serialized bytes
pub fn commitment(script: &Script) -> Hash {
    commitment_of_bytes(&script.to_bytes())
}

fn commitment_of_bytes(bytes: &[u8]) -> Hash {
    let digest = Sha256::digest(bytes);
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&digest);
    hash
}

/// Build the witness-program locking script `{version, commitment}` for a
/// funding output
pub fn witness_program(script: &Script) -> ByteString {
    let hash = commitment(script);
    let mut program = Vec::with_capacity(34);
    program.push(WITNESS_V0);
    program.push(hash.len() as u8);
    program.extend_from_slice(&hash);
    program
}

/// Extract the commitment from a v0 witness-program locking script
pub fn parse_witness_program(script_pubkey: &[u8]) -> Result<Hash> {
    if script_pubkey.len() != 34 || script_pubkey[0] != OP_0 || script_pubkey[1] != 0x20 {
        return Err(EngineError::Serialization(format!(
            "not a v0 witness program: {} bytes",
            script_pubkey.len()
        )));
    }
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&script_pubkey[2..34]);
    Ok(hash)
}

/// Verify a script presented at spend time against an expected commitment
pub fn verify(candidate_bytes: &[u8], expected: &Hash) -> Result<()> {
    let recomputed = commitment_of_bytes(candidate_bytes);
    if recomputed != *expected {
        return Err(EngineError::CommitmentMismatch(format!(
            "script hashes to {} but output commits to {}",
            hex(&recomputed),
            hex(expected)
        )));
    }
    Ok(())
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
