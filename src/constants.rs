//! Protocol constants for script and transaction construction

/// Lock time threshold: encoded values below this are block heights,
/// values at or above it are UNIX timestamps
pub const LOCKTIME_THRESHOLD: u32 = 500_000_000;

/// Sequence number for a fully final input (absolute lock time disabled)
pub const SEQUENCE_FINAL: u32 = 0xffffffff;

/// Final-but-one sequence: keeps absolute lock time enforcement active
pub const SEQUENCE_ENABLE_LOCKTIME: u32 = 0xfffffffe;

/// Transaction version used for constructed transactions
pub const TX_VERSION: u32 = 2;

/// Witness version byte for P2WSH programs
pub const WITNESS_V0: u8 = 0x00;

/// SegWit serialization marker byte
pub const SEGWIT_MARKER: u8 = 0x00;

/// SegWit serialization flag byte
pub const SEGWIT_FLAG: u8 = 0x01;

/// Maximum script length
pub const MAX_SCRIPT_SIZE: usize = 10_000;

/// Largest opcode that is a direct data push (push of 1..=75 bytes)
pub const OP_PUSHBYTES_MAX: u8 = 0x4b;

// Opcodes used by the CLTV branch template

/// OP_0: push empty byte string
pub const OP_0: u8 = 0x00;

/// OP_PUSHDATA1: next byte is push length
pub const OP_PUSHDATA1: u8 = 0x4c;

/// OP_PUSHDATA2: next two bytes (LE) are push length
pub const OP_PUSHDATA2: u8 = 0x4d;

/// OP_PUSHDATA4: next four bytes (LE) are push length
pub const OP_PUSHDATA4: u8 = 0x4e;

/// OP_IF: execute branch if top of stack is truthy
pub const OP_IF: u8 = 0x63;

/// OP_ELSE: alternate branch
pub const OP_ELSE: u8 = 0x67;

/// OP_ENDIF: end of conditional
pub const OP_ENDIF: u8 = 0x68;

/// OP_DROP: remove top stack item
pub const OP_DROP: u8 = 0x75;

/// OP_CHECKSIG: verify signature, push result
pub const OP_CHECKSIG: u8 = 0xac;

/// OP_CHECKSIGVERIFY: verify signature, fail script if invalid
pub const OP_CHECKSIGVERIFY: u8 = 0xad;

/// OP_CHECKLOCKTIMEVERIFY: fail unless tx lock time reaches the operand.
/// Leaves its operand on the stack, so the template pairs it with OP_DROP.
pub const OP_CHECKLOCKTIMEVERIFY: u8 = 0xb1;

/// SIGHASH_ALL flag byte: signature commits to all outputs
pub const SIGHASH_ALL: u8 = 0x01;

/// Compressed public key length
pub const PUBKEY_COMPRESSED_LEN: usize = 33;

/// Uncompressed public key length
pub const PUBKEY_UNCOMPRESSED_LEN: usize = 65;
