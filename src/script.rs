//! Script model and CLTV branch script construction
//!
//! The engine never executes scripts. It emits the one two-branch redemption
//! template it knows about and statically reasons over parsed opcodes, so no
//! interpreter or execution state machine exists here.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{EngineError, Result};
use crate::locktime::LockTimeValue;
use crate::scriptnum;
use crate::types::ByteString;

/// A single script element: raw opcode or length-prefixed data push
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    Code(u8),
    Push(ByteString),
}

/// An immutable ordered opcode sequence.
///
/// Two scripts are equal iff their serialized bytes are equal: a lock time
/// embedded as a push makes structurally similar templates collide only when
/// the underlying value matches exactly, so byte equality is the only
/// comparison that means anything.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Script {
    ops: Vec<Op>,
}

impl PartialEq for Script {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Script {
    pub fn new(ops: Vec<Op>) -> Self {
        Script { ops }
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Serialize to wire bytes, using the minimal push opcode for each
    /// data element
    pub fn to_bytes(&self) -> ByteString {
        let mut bytes = Vec::new();
        for op in &self.ops {
            match op {
                Op::Code(code) => bytes.push(*code),
                Op::Push(data) => {
                    if data.is_empty() {
                        bytes.push(OP_0);
                    } else if data.len() <= OP_PUSHBYTES_MAX as usize {
                        bytes.push(data.len() as u8);
                        bytes.extend_from_slice(data);
                    } else if data.len() <= 0xff {
                        bytes.push(OP_PUSHDATA1);
                        bytes.push(data.len() as u8);
                        bytes.extend_from_slice(data);
                    } else if data.len() <= 0xffff {
                        bytes.push(OP_PUSHDATA2);
                        bytes.extend_from_slice(&(data.len() as u16).to_le_bytes());
                        bytes.extend_from_slice(data);
                    } else {
                        bytes.push(OP_PUSHDATA4);
                        bytes.extend_from_slice(&(data.len() as u32).to_le_bytes());
                        bytes.extend_from_slice(data);
                    }
                }
            }
        }
        bytes
    }

    /// Parse wire bytes into opcodes, reading push lengths exactly
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > MAX_SCRIPT_SIZE {
            return Err(EngineError::Serialization(format!(
                "script too large: {} bytes",
                bytes.len()
            )));
        }

        let mut ops = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            let opcode = bytes[i];
            i += 1;
            let push_len = match opcode {
                OP_0 => {
                    ops.push(Op::Push(vec![]));
                    continue;
                }
                1..=OP_PUSHBYTES_MAX => opcode as usize,
                OP_PUSHDATA1 => {
                    let len = *bytes.get(i).ok_or_else(|| {
                        EngineError::Serialization("truncated PUSHDATA1 length".to_string())
                    })? as usize;
                    i += 1;
                    len
                }
                OP_PUSHDATA2 => {
                    if i + 2 > bytes.len() {
                        return Err(EngineError::Serialization(
                            "truncated PUSHDATA2 length".to_string(),
                        ));
                    }
                    let len = u16::from_le_bytes([bytes[i], bytes[i + 1]]) as usize;
                    i += 2;
                    len
                }
                OP_PUSHDATA4 => {
                    if i + 4 > bytes.len() {
                        return Err(EngineError::Serialization(
                            "truncated PUSHDATA4 length".to_string(),
                        ));
                    }
                    let len = u32::from_le_bytes([
                        bytes[i],
                        bytes[i + 1],
                        bytes[i + 2],
                        bytes[i + 3],
                    ]) as usize;
                    i += 4;
                    len
                }
                code => {
                    ops.push(Op::Code(code));
                    continue;
                }
            };

            if i + push_len > bytes.len() {
                return Err(EngineError::Serialization(format!(
                    "push of {} bytes overruns script end",
                    push_len
                )));
            }
            ops.push(Op::Push(bytes[i..i + push_len].to_vec()));
            i += push_len;
        }

        Ok(Script { ops })
    }

    /// Whether the script contains an absolute time-lock opcode. Used by the
    /// transaction assembler to enforce the lock_time/sequence invariant at
    /// witness-attach time.
    pub fn requires_lock_time(&self) -> bool {
        self.ops
            .iter()
            .any(|op| matches!(op, Op::Code(code) if *code == OP_CHECKLOCKTIMEVERIFY))
    }
}

/// Check that a public key has a well-formed shape: 33 bytes with an 0x02 or
/// 0x03 prefix, or 65 bytes with an 0x04 prefix. No curve validation; that
/// belongs to the signing capability.
pub fn check_pubkey(key: &[u8]) -> Result<()> {
    match (key.len(), key.first()) {
        (PUBKEY_COMPRESSED_LEN, Some(0x02) | Some(0x03)) => Ok(()),
        (PUBKEY_UNCOMPRESSED_LEN, Some(0x04)) => Ok(()),
        _ => Err(EngineError::InvalidKey(format!(
            "bad key shape: {} bytes, prefix {:02x?}",
            key.len(),
            key.first()
        ))),
    }
}

/// Build the two-branch redemption script:
///
/// ```text
/// OP_IF
///     <lock> OP_CHECKLOCKTIMEVERIFY OP_DROP
/// OP_ELSE
///     <secondary_key> OP_CHECKSIGVERIFY
/// OP_ENDIF
/// <primary_key> OP_CHECKSIG
/// ```
///
/// The time-locked path is the IF branch so that the discriminator pushed
/// last on the unlocking side selects the executing half. OP_CLTV leaves its
/// operand on the stack, hence the trailing OP_DROP. The cooperative branch
/// uses OP_CHECKSIGVERIFY so that both it and the final bare OP_CHECKSIG must
/// pass; the time-locked branch only needs the final check.
pub fn build_cltv_branch_script(
    primary_key: &[u8],
    secondary_key: &[u8],
    lock: LockTimeValue,
) -> Result<Script> {
    check_pubkey(primary_key)?;
    check_pubkey(secondary_key)?;

    Ok(Script::new(vec![
        Op::Code(OP_IF),
        Op::Push(scriptnum::encode(lock.encode() as i64)),
        Op::Code(OP_CHECKLOCKTIMEVERIFY),
        Op::Code(OP_DROP),
        Op::Code(OP_ELSE),
        Op::Push(secondary_key.to_vec()),
        Op::Code(OP_CHECKSIGVERIFY),
        Op::Code(OP_ENDIF),
        Op::Push(primary_key.to_vec()),
        Op::Code(OP_CHECKSIG),
    ]))
}
