//! # Ed25519 Signing and Verification
//!
//! Key generation, signing, and verification for every token in the
//! pipeline (credentials, presentation requests, presentations).
//!
//! ## Security Invariant
//!
//! - Signing input MUST be a [`SigningInput`]. For tokens this crate
//!   produces, the payload segment inside it was built from
//!   `CanonicalBytes`; you cannot sign an arbitrary byte slice.
//! - Private keys are never serialized or logged. `Ed25519KeyPair` does
//!   not implement `Serialize` or expose the private key bytes.

use ed25519_dalek::{Signer as _, Verifier as _};
use vcgate_core::CryptoError;

use crate::jws::SigningInput;

/// An Ed25519 public key (32 bytes) for signature verification.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey(pub [u8; 32]);

/// An Ed25519 signature (64 bytes).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Ed25519Signature(pub [u8; 64]);

/// An Ed25519 key pair for signing operations.
///
/// Does not implement `Serialize`.
pub struct Ed25519KeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

// ---------------------------------------------------------------------------
// Ed25519PublicKey impls
// ---------------------------------------------------------------------------

impl Ed25519PublicKey {
    /// Create a public key from raw 32 bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create a public key from a slice, which must be exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| {
            CryptoError::KeyError(format!("public key must be 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(arr))
    }

    /// Return the raw 32-byte public key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to an `ed25519_dalek::VerifyingKey`.
    ///
    /// Fails if the bytes are not a valid curve point.
    pub fn to_verifying_key(&self) -> Result<ed25519_dalek::VerifyingKey, CryptoError> {
        ed25519_dalek::VerifyingKey::from_bytes(&self.0)
            .map_err(|e| CryptoError::KeyError(format!("invalid public key: {e}")))
    }
}

impl std::fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519PublicKey({}...)", hex_prefix(&self.0))
    }
}

// ---------------------------------------------------------------------------
// Ed25519Signature impls
// ---------------------------------------------------------------------------

impl Ed25519Signature {
    /// Create a signature from a slice, which must be exactly 64 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; 64] = bytes.try_into().map_err(|_| {
            CryptoError::VerificationFailed(format!(
                "signature must be 64 bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    /// Return the raw 64-byte signature.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl std::fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519Signature({}...)", hex_prefix(&self.0))
    }
}

// ---------------------------------------------------------------------------
// Ed25519KeyPair impls
// ---------------------------------------------------------------------------

impl Ed25519KeyPair {
    /// Generate a new random Ed25519 key pair from the OS RNG.
    pub fn generate() -> Self {
        let signing_key = ed25519_dalek::SigningKey::generate(&mut rand_core::OsRng);
        Self { signing_key }
    }

    /// Create a key pair from a raw 32-byte private key seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// Get the public key from this key pair.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a JWS signing input.
    pub fn sign(&self, input: &SigningInput) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(input.as_bytes()).to_bytes())
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519KeyPair(<private>)")
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify an Ed25519 signature over a JWS signing input.
///
/// Returns `Err(CryptoError::KeyError)` if the public key is not a valid
/// curve point and `Err(CryptoError::VerificationFailed)` if the signature
/// does not match.
pub fn verify(
    input: &SigningInput,
    signature: &Ed25519Signature,
    public_key: &Ed25519PublicKey,
) -> Result<(), CryptoError> {
    let vk = public_key.to_verifying_key()?;
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    vk.verify(input.as_bytes(), &sig)
        .map_err(|e| CryptoError::VerificationFailed(format!("Ed25519 verification failed: {e}")))
}

// ---------------------------------------------------------------------------
// Hex utilities
// ---------------------------------------------------------------------------

fn hex_prefix(bytes: &[u8]) -> String {
    bytes.iter().take(4).map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vcgate_core::CanonicalBytes;

    fn input(value: serde_json::Value) -> SigningInput {
        let header = CanonicalBytes::new(&serde_json::json!({"alg": "EdDSA"})).unwrap();
        let payload = CanonicalBytes::new(&value).unwrap();
        SigningInput::from_canonical(&header, &payload)
    }

    #[test]
    fn test_sign_and_verify() {
        let kp = Ed25519KeyPair::generate();
        let msg = input(serde_json::json!({"iss": "did:key:z1", "nonce": 42}));
        let sig = kp.sign(&msg);
        verify(&msg, &sig, &kp.public_key()).expect("valid signature should verify");
    }

    #[test]
    fn test_verify_wrong_key_fails() {
        let kp1 = Ed25519KeyPair::generate();
        let kp2 = Ed25519KeyPair::generate();
        let msg = input(serde_json::json!({"test": true}));
        let sig = kp1.sign(&msg);
        assert!(matches!(
            verify(&msg, &sig, &kp2.public_key()),
            Err(CryptoError::VerificationFailed(_))
        ));
    }

    #[test]
    fn test_verify_wrong_message_fails() {
        let kp = Ed25519KeyPair::generate();
        let sig = kp.sign(&input(serde_json::json!({"msg": "original"})));
        let tampered = input(serde_json::json!({"msg": "tampered"}));
        assert!(verify(&tampered, &sig, &kp.public_key()).is_err());
    }

    #[test]
    fn test_deterministic_from_seed() {
        let seed = [42u8; 32];
        let kp1 = Ed25519KeyPair::from_seed(&seed);
        let kp2 = Ed25519KeyPair::from_seed(&seed);
        assert_eq!(kp1.public_key(), kp2.public_key());

        let msg = input(serde_json::json!({"test": "deterministic"}));
        assert_eq!(kp1.sign(&msg), kp2.sign(&msg));
    }

    #[test]
    fn test_public_key_from_slice_length() {
        let pk = Ed25519KeyPair::generate().public_key();
        assert_eq!(Ed25519PublicKey::from_slice(pk.as_bytes()).unwrap(), pk);
        assert!(Ed25519PublicKey::from_slice(&[0u8; 31]).is_err());
        assert!(Ed25519PublicKey::from_slice(&[0u8; 33]).is_err());
    }

    #[test]
    fn test_signature_from_slice_length() {
        assert!(Ed25519Signature::from_slice(&[0u8; 64]).is_ok());
        assert!(Ed25519Signature::from_slice(&[0u8; 63]).is_err());
    }

    #[test]
    fn test_debug_does_not_leak_private_key() {
        let kp = Ed25519KeyPair::generate();
        assert_eq!(format!("{kp:?}"), "Ed25519KeyPair(<private>)");
    }

    #[test]
    fn test_debug_public_key_shows_prefix() {
        let debug = format!("{:?}", Ed25519KeyPair::generate().public_key());
        assert!(debug.starts_with("Ed25519PublicKey("));
        assert!(debug.ends_with("...)"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// A signature verifies under its own key and no other.
            #[test]
            fn signature_binds_key_and_message(
                seed in any::<[u8; 32]>(),
                other_seed in any::<[u8; 32]>(),
                nonce in any::<u32>(),
                text in "[a-zA-Z0-9 ]{0,40}",
            ) {
                prop_assume!(seed != other_seed);
                let kp = Ed25519KeyPair::from_seed(&seed);
                let msg = input(serde_json::json!({"nonce": nonce, "text": text}));
                let sig = kp.sign(&msg);

                prop_assert!(verify(&msg, &sig, &kp.public_key()).is_ok());
                let stranger = Ed25519KeyPair::from_seed(&other_seed).public_key();
                prop_assert!(verify(&msg, &sig, &stranger).is_err());
                let altered = input(serde_json::json!({"nonce": nonce, "text": format!("{text}!")}));
                prop_assert!(verify(&altered, &sig, &kp.public_key()).is_err());
            }
        }
    }
}
