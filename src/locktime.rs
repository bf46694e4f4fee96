//! Absolute lock time encoding
//!
//! The protocol uses a single 32-bit field for both block heights and UNIX
//! timestamps, discriminated by a fixed threshold: values below 500,000,000
//! are heights, values at or above it are timestamps. The bare u32 encoding
//! is wire-level; no tag byte exists or may be added.

use serde::{Deserialize, Serialize};

use crate::constants::LOCKTIME_THRESHOLD;
use crate::error::{EngineError, Result};

/// A lock time expressed in domain terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockTimeValue {
    BlockHeight(u32),
    UnixTime(u32),
}

impl LockTimeValue {
    /// Build a height lock, validating the threshold invariant
    pub fn from_height(height: u32) -> Result<Self> {
        if height >= LOCKTIME_THRESHOLD {
            return Err(EngineError::OutOfRange(format!(
                "block height {} not below threshold {}",
                height, LOCKTIME_THRESHOLD
            )));
        }
        Ok(LockTimeValue::BlockHeight(height))
    }

    /// Build a timestamp lock, subtracting an optional safety margin first.
    ///
    /// Callers wanting immediate spendability typically pass "now" with a
    /// margin of several hours; the engine only enforces that the resulting
    /// value still reads as a timestamp.
    pub fn from_timestamp(timestamp: u32, safety_margin: Option<u32>) -> Result<Self> {
        let adjusted = timestamp.saturating_sub(safety_margin.unwrap_or(0));
        if adjusted < LOCKTIME_THRESHOLD {
            return Err(EngineError::OutOfRange(format!(
                "timestamp {} below threshold {}",
                adjusted, LOCKTIME_THRESHOLD
            )));
        }
        Ok(LockTimeValue::UnixTime(adjusted))
    }

    /// The single 32-bit protocol representation, used both by the script
    /// opcode operand and the transaction lock_time field
    pub fn encode(&self) -> u32 {
        match self {
            LockTimeValue::BlockHeight(h) => *h,
            LockTimeValue::UnixTime(t) => *t,
        }
    }

    /// Recover the tagged value from its 32-bit encoding. Lossless: the tag
    /// is fully determined by the threshold comparison.
    pub fn decode(raw: u32) -> Self {
        if raw < LOCKTIME_THRESHOLD {
            LockTimeValue::BlockHeight(raw)
        } else {
            LockTimeValue::UnixTime(raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_roundtrip() {
        let lock = LockTimeValue::from_height(500).unwrap();
        assert_eq!(lock, LockTimeValue::BlockHeight(500));
        assert_eq!(LockTimeValue::decode(lock.encode()), lock);
    }

    #[test]
    fn test_timestamp_roundtrip() {
        let lock = LockTimeValue::from_timestamp(1_700_000_000, None).unwrap();
        assert_eq!(lock, LockTimeValue::UnixTime(1_700_000_000));
        assert_eq!(LockTimeValue::decode(lock.encode()), lock);
    }

    #[test]
    fn test_threshold_boundary() {
        // Last valid height
        let lock = LockTimeValue::from_height(LOCKTIME_THRESHOLD - 1).unwrap();
        assert_eq!(
            LockTimeValue::decode(lock.encode()),
            LockTimeValue::BlockHeight(LOCKTIME_THRESHOLD - 1)
        );
        // First valid timestamp
        let lock = LockTimeValue::from_timestamp(LOCKTIME_THRESHOLD, None).unwrap();
        assert_eq!(
            LockTimeValue::decode(lock.encode()),
            LockTimeValue::UnixTime(LOCKTIME_THRESHOLD)
        );
    }

    #[test]
    fn test_height_at_threshold_rejected() {
        assert!(matches!(
            LockTimeValue::from_height(LOCKTIME_THRESHOLD),
            Err(EngineError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_timestamp_below_threshold_rejected() {
        assert!(matches!(
            LockTimeValue::from_timestamp(LOCKTIME_THRESHOLD - 1, None),
            Err(EngineError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_safety_margin_subtracted() {
        let lock = LockTimeValue::from_timestamp(1_700_000_000, Some(6 * 3600)).unwrap();
        assert_eq!(lock, LockTimeValue::UnixTime(1_700_000_000 - 6 * 3600));
    }

    #[test]
    fn test_safety_margin_crossing_threshold_rejected() {
        // Margin pushes the value below the threshold, where it would decode
        // as a block height
        assert!(matches!(
            LockTimeValue::from_timestamp(LOCKTIME_THRESHOLD + 10, Some(100)),
            Err(EngineError::OutOfRange(_))
        ));
    }
}
