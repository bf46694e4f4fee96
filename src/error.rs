//! Error types for transaction construction

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Malformed script number encoding: {0}")]
    MalformedEncoding(String),

    #[error("Lock time out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid public key: {0}")]
    InvalidKey(String),

    #[error("Unsupported sighash flag: {0}")]
    UnsupportedSighashFlag(String),

    #[error("Inconsistent lock time: {0}")]
    InconsistentLockTime(String),

    #[error("Witness commitment mismatch: {0}")]
    CommitmentMismatch(String),

    #[error("Outpoint lookup failed: {0}")]
    LookupFailure(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
