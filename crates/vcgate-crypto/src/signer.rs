//! # Signing Capabilities
//!
//! A [`Signer`] is everything a token producer needs: the DID that will
//! appear as `iss`, the DID URL that will appear as the header `kid`, and
//! the ability to sign a [`SigningInput`]. Issuers, relying parties and
//! holders all sign through this trait.

use vcgate_core::{CryptoError, Did};

use crate::did_key;
use crate::ed25519::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
use crate::jws::SigningInput;

/// JWS signature algorithms this crate produces and verifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Ed25519 (RFC 8037).
    EdDSA,
}

impl Algorithm {
    /// The JOSE `alg` header value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::EdDSA => "EdDSA",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key-bound signing capability.
pub trait Signer: Send + Sync {
    /// The DID the signer speaks for; written to `iss`.
    fn did(&self) -> &Did;

    /// The verification method id; written to the header `kid`.
    fn key_id(&self) -> &str;

    /// The signature algorithm.
    fn algorithm(&self) -> Algorithm {
        Algorithm::EdDSA
    }

    /// Sign a JWS signing input.
    fn try_sign(&self, input: &SigningInput) -> Result<Ed25519Signature, CryptoError>;
}

/// A [`Signer`] backed by an in-memory Ed25519 key and its `did:key`.
pub struct KeySigner {
    keypair: Ed25519KeyPair,
    did: Did,
    kid: String,
}

impl KeySigner {
    /// Wrap an existing key pair.
    pub fn new(keypair: Ed25519KeyPair) -> Self {
        let public_key = keypair.public_key();
        Self {
            did: did_key::did_for(&public_key),
            kid: did_key::key_id_for(&public_key),
            keypair,
        }
    }

    /// A signer with a freshly generated key.
    pub fn generate() -> Self {
        Self::new(Ed25519KeyPair::generate())
    }

    /// A signer with a deterministic key, for fixtures.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self::new(Ed25519KeyPair::from_seed(seed))
    }

    /// The public half of the signing key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }
}

impl Signer for KeySigner {
    fn did(&self) -> &Did {
        &self.did
    }

    fn key_id(&self) -> &str {
        &self.kid
    }

    fn try_sign(&self, input: &SigningInput) -> Result<Ed25519Signature, CryptoError> {
        Ok(self.keypair.sign(input))
    }
}

impl std::fmt::Debug for KeySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySigner")
            .field("did", &self.did)
            .field("kid", &self.kid)
            .finish_non_exhaustive()
    }
}
