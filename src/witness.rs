//! Witness stack assembly
//!
//! The stack a spender presents must match the script's consumption order
//! exactly; the execution engine pops elements last-pushed-first. A swapped
//! signature or a fat "true" marker does not fail here, it fails on-chain, so
//! the assembler is the single place these orderings are written down.

use crate::error::{EngineError, Result};
use crate::script::Script;
use crate::types::{ByteString, RedemptionBranch, WitnessStack};

/// Canonical truthy branch discriminator: the minimal single-byte push.
/// Lenient validators accept longer truthy encodings; emitting one anyway is
/// an interoperability hazard, so the engine never does.
pub const TRUE_MARKER: [u8; 1] = [0x01];

/// Canonical falsy branch discriminator: the empty push
pub const FALSE_MARKER: [u8; 0] = [];

/// Assemble the witness stack for a chosen redemption branch.
///
/// Signatures are in witness-element form (DER plus flag byte, see
/// `sighash::encode_signature`). The cooperative branch requires the
/// secondary signature; the time-locked branch ignores it.
///
/// - `TimeLocked`  -> `[primary_sig, 0x01, witness_script]`
/// - `Cooperative` -> `[primary_sig, secondary_sig, <empty>, witness_script]`
pub fn assemble(
    branch: RedemptionBranch,
    primary_signature: &[u8],
    secondary_signature: Option<&[u8]>,
    witness_script: &Script,
) -> Result<WitnessStack> {
    let script_bytes = witness_script.to_bytes();
    match branch {
        RedemptionBranch::TimeLocked => Ok(vec![
            primary_signature.to_vec(),
            TRUE_MARKER.to_vec(),
            script_bytes,
        ]),
        RedemptionBranch::Cooperative => {
            let secondary = secondary_signature.ok_or_else(|| {
                EngineError::Signing(
                    "cooperative branch requires a secondary signature".to_string(),
                )
            })?;
            Ok(vec![
                primary_signature.to_vec(),
                secondary.to_vec(),
                FALSE_MARKER.to_vec(),
                script_bytes,
            ])
        }
    }
}

/// The witness script element: always the final stack entry for P2WSH
pub fn witness_script_of(stack: &WitnessStack) -> Option<&ByteString> {
    stack.last()
}
