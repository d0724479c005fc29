//! # did:key Identifiers
//!
//! The `did:key` method expands a static Ed25519 public key into a DID:
//! the multicodec prefix `0xed 0x01` followed by the 32 key bytes, encoded
//! as multibase base58btc (leading `z`). Resolution is the inverse, so no
//! registry or network is involved.
//!
//! See <https://w3c-ccg.github.io/did-method-key>.

use multibase::Base;
use vcgate_core::{Did, ResolutionError};

use crate::ed25519::Ed25519PublicKey;
use crate::resolver::Resolver;

const ED25519_CODEC: [u8; 2] = [0xed, 0x01];

/// The multibase-encoded multikey for a public key (`z6Mk...`).
pub fn multikey(public_key: &Ed25519PublicKey) -> String {
    let mut multi_bytes = Vec::with_capacity(34);
    multi_bytes.extend_from_slice(&ED25519_CODEC);
    multi_bytes.extend_from_slice(public_key.as_bytes());
    multibase::encode(Base::Base58Btc, &multi_bytes)
}

/// The `did:key` DID for a public key.
pub fn did_for(public_key: &Ed25519PublicKey) -> Did {
    Did::parse(&format!("did:key:{}", multikey(public_key)))
        .expect("BUG: non-empty base58 multikey rejected by Did::parse")
}

/// The verification method id (`did:key:z6Mk...#z6Mk...`) used as a JWS `kid`.
pub fn key_id_for(public_key: &Ed25519PublicKey) -> String {
    let multikey = multikey(public_key);
    format!("did:key:{multikey}#{multikey}")
}

/// Decode the public key embedded in a `did:key` DID.
pub fn public_key_from(did: &Did) -> Result<Ed25519PublicKey, ResolutionError> {
    let invalid = |reason: String| ResolutionError::InvalidDid {
        did: did.to_string(),
        reason,
    };

    if did.method() != "key" {
        return Err(ResolutionError::UnsupportedMethod(did.method().to_string()));
    }
    let id = did.method_specific_id();
    if !id.starts_with('z') {
        return Err(invalid("multikey must be base58btc (z prefix)".into()));
    }
    let (_, key_bytes) =
        multibase::decode(id).map_err(|e| invalid(format!("issue decoding key: {e}")))?;
    if key_bytes.len() != ED25519_CODEC.len() + 32 {
        return Err(invalid(format!("invalid key length {}", key_bytes.len())));
    }
    if key_bytes[..2] != ED25519_CODEC {
        return Err(invalid("unsupported key codec".into()));
    }
    Ed25519PublicKey::from_slice(&key_bytes[2..]).map_err(|e| invalid(e.to_string()))
}

/// Resolves `did:key` identifiers by decoding them. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct DidKeyResolver;

impl Resolver for DidKeyResolver {
    fn resolve(&self, did: &Did) -> Result<Ed25519PublicKey, ResolutionError> {
        public_key_from(did)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ed25519::Ed25519KeyPair;

    const DID: &str = "did:key:z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK";

    #[test]
    fn known_did_decodes_to_32_byte_key() {
        let did = Did::parse(DID).unwrap();
        let pk = DidKeyResolver.resolve(&did).expect("should resolve");
        assert_eq!(did_for(&pk), did);
    }

    #[test]
    fn generated_key_roundtrips_through_did() {
        let pk = Ed25519KeyPair::generate().public_key();
        let did = did_for(&pk);
        assert!(did.as_str().starts_with("did:key:z6Mk"));
        assert_eq!(public_key_from(&did).unwrap(), pk);
    }

    #[test]
    fn key_id_is_did_url_of_the_did() {
        let pk = Ed25519KeyPair::from_seed(&[7u8; 32]).public_key();
        let kid = key_id_for(&pk);
        assert_eq!(Did::from_did_url(&kid).unwrap(), did_for(&pk));
        assert!(kid.ends_with(&multikey(&pk)));
    }

    #[test]
    fn other_methods_are_unsupported() {
        let did = Did::parse("did:web:example.com").unwrap();
        assert_eq!(
            public_key_from(&did),
            Err(ResolutionError::UnsupportedMethod("web".into()))
        );
    }

    #[test]
    fn malformed_multikey_is_invalid() {
        for bad in ["did:key:abc", "did:key:z0OIl", "did:key:z6Mk"] {
            let did = Did::parse(bad).unwrap();
            assert!(
                matches!(public_key_from(&did), Err(ResolutionError::InvalidDid { .. })),
                "{bad} should be rejected"
            );
        }
    }
}
