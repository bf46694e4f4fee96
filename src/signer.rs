//! Injected signing capability
//!
//! The engine treats signing as an opaque synchronous function over a
//! 32-byte digest. Curve arithmetic is never inspected or validated here;
//! callers may substitute a stub for deterministic tests.

use secp256k1::{All, Message, PublicKey, Secp256k1, SecretKey};

use crate::error::{EngineError, Result};
use crate::types::{ByteString, Hash};

/// Opaque signing capability: a public key and a digest-to-signature
/// function. Signatures are DER-encoded; the witness assembler appends the
/// sighash flag byte separately.
pub trait Signer {
    fn public_key(&self) -> ByteString;
    fn sign(&self, digest: &Hash) -> Result<ByteString>;
}

/// secp256k1-backed signer over an in-memory secret key
pub struct KeySigner {
    secp: Secp256k1<All>,
    secret: SecretKey,
    public: PublicKey,
}

impl KeySigner {
    pub fn from_secret_bytes(secret: &[u8; 32]) -> Result<Self> {
        let secp = Secp256k1::new();
        let secret = SecretKey::from_slice(secret)
            .map_err(|e| EngineError::Signing(format!("bad secret key: {}", e)))?;
        let public = PublicKey::from_secret_key(&secp, &secret);
        Ok(KeySigner {
            secp,
            secret,
            public,
        })
    }
}

impl Signer for KeySigner {
    fn public_key(&self) -> ByteString {
        self.public.serialize().to_vec()
    }

    fn sign(&self, digest: &Hash) -> Result<ByteString> {
        let message = Message::from_digest_slice(digest)
            .map_err(|e| EngineError::Signing(format!("bad digest: {}", e)))?;
        let signature = self.secp.sign_ecdsa(&message, &self.secret);
        Ok(signature.serialize_der().to_vec())
    }
}
