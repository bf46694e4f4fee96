//! Script number codec
//!
//! Signed integers inside scripts are encoded as the shortest little-endian
//! byte sequence where the most significant bit of the final byte carries the
//! sign. When the magnitude's own top bit would be misread as a sign bit, an
//! extra 0x00 (or 0x80 for negatives) byte is appended. Zero encodes as the
//! empty byte string. Decoding rejects any non-minimal form.

use crate::error::{EngineError, Result};
use crate::types::ByteString;

/// Encode a signed integer in minimal script-number form
pub fn encode(value: i64) -> ByteString {
    if value == 0 {
        return vec![];
    }

    let negative = value < 0;
    let mut magnitude = value.unsigned_abs();
    let mut bytes = Vec::new();

    while magnitude > 0 {
        bytes.push((magnitude & 0xff) as u8);
        magnitude >>= 8;
    }

    // Top bit of the last byte is reserved for sign
    let last = *bytes.last().unwrap();
    if last & 0x80 != 0 {
        bytes.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        *bytes.last_mut().unwrap() |= 0x80;
    }

    bytes
}

/// Decode a minimal script-number encoding
///
/// Fails with `MalformedEncoding` if the input carries a padding byte that a
/// minimal encoding would not have.
pub fn decode(bytes: &[u8]) -> Result<i64> {
    if bytes.is_empty() {
        return Ok(0);
    }

    let last = bytes[bytes.len() - 1];
    if last & 0x7f == 0 {
        // A trailing 0x00/0x80 is only allowed when it protects the sign bit
        // of the preceding byte
        if bytes.len() == 1 || bytes[bytes.len() - 2] & 0x80 == 0 {
            return Err(EngineError::MalformedEncoding(format!(
                "non-minimal script number: {:02x?}",
                bytes
            )));
        }
    }

    if bytes.len() > 8 {
        return Err(EngineError::MalformedEncoding(format!(
            "script number too long: {} bytes",
            bytes.len()
        )));
    }

    let mut magnitude: u64 = 0;
    for (i, byte) in bytes.iter().enumerate() {
        let b = if i == bytes.len() - 1 { byte & 0x7f } else { *byte };
        magnitude |= (b as u64) << (8 * i);
    }

    if last & 0x80 != 0 {
        Ok(-(magnitude as i64))
    } else {
        Ok(magnitude as i64)
    }
}
