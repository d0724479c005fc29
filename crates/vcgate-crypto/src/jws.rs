//! # JSON Web Signature (JWS): Compact Serialization
//!
//! Every token in the pipeline is a compact JWS ([RFC 7515]):
//! `base64url(header) "." base64url(claims) "." base64url(signature)`.
//!
//! Header and claims are serialized through `CanonicalBytes`, so a token
//! produced here has a deterministic payload segment for given claims.
//! Decoding accepts any well-formed JSON; signature verification always
//! runs over the segments exactly as received.
//!
//! [RFC 7515]: https://www.rfc-editor.org/rfc/rfc7515

use base64ct::{Base64UrlUnpadded, Encoding};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use vcgate_core::{CanonicalBytes, CryptoError};

use crate::ed25519::Ed25519Signature;
use crate::signer::Signer;

/// Media type written to the `typ` header.
pub const TYP_JWT: &str = "JWT";

/// JOSE protected header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Signature algorithm.
    pub alg: String,
    /// Media type of the complete token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    /// DID URL of the signing key.
    pub kid: String,
}

/// A decoded token.
#[derive(Debug, Clone, PartialEq)]
pub struct Jwt<T> {
    /// The protected header.
    pub header: Header,
    /// The claims.
    pub claims: T,
}

/// The bytes covered by a JWS signature: `header "." payload`, both
/// base64url-encoded.
///
/// Built either from canonical header and payload bytes when producing a
/// token, or from the first two segments of a received token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningInput(String);

impl SigningInput {
    /// Build the signing input from canonical header and payload bytes.
    pub fn from_canonical(header: &CanonicalBytes, payload: &CanonicalBytes) -> Self {
        Self(format!(
            "{}.{}",
            Base64UrlUnpadded::encode_string(header.as_bytes()),
            Base64UrlUnpadded::encode_string(payload.as_bytes())
        ))
    }

    /// The signed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// The signed bytes as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A token split into its parts, signature not yet checked.
#[derive(Debug)]
pub(crate) struct Parts {
    pub(crate) header: Header,
    pub(crate) payload: Vec<u8>,
    pub(crate) signing_input: SigningInput,
    pub(crate) signature: Ed25519Signature,
}

impl Parts {
    /// Split and decode a compact JWS.
    pub(crate) fn parse(token: &str) -> Result<Self, CryptoError> {
        let segments: Vec<&str> = token.split('.').collect();
        let &[header_b64, payload_b64, sig_b64] = segments.as_slice() else {
            return Err(CryptoError::MalformedToken(format!(
                "compact JWS needs 3 segments, got {}",
                segments.len()
            )));
        };

        let header_bytes = decode_segment("header", header_b64)?;
        let header: Header = serde_json::from_slice(&header_bytes)
            .map_err(|e| CryptoError::MalformedToken(format!("issue deserializing header: {e}")))?;
        let payload = decode_segment("claims", payload_b64)?;
        let sig_bytes = decode_segment("signature", sig_b64)?;
        let signature = Ed25519Signature::from_slice(&sig_bytes)
            .map_err(|e| CryptoError::MalformedToken(e.to_string()))?;

        Ok(Self {
            header,
            payload,
            signing_input: SigningInput(format!("{header_b64}.{payload_b64}")),
            signature,
        })
    }

    /// Deserialize the payload.
    pub(crate) fn claims<T: DeserializeOwned>(&self) -> Result<T, CryptoError> {
        serde_json::from_slice(&self.payload)
            .map_err(|e| CryptoError::MalformedToken(format!("issue deserializing claims: {e}")))
    }
}

fn decode_segment(name: &str, segment: &str) -> Result<Vec<u8>, CryptoError> {
    Base64UrlUnpadded::decode_vec(segment)
        .map_err(|e| CryptoError::MalformedToken(format!("issue decoding {name}: {e}")))
}

/// Encode the claims and sign, returning a token in compact JWS form.
///
/// # Errors
///
/// Returns `CryptoError::Canonicalization` if the claims contain floats or
/// fail to serialize, or whatever error the signer reports.
pub fn encode<T: Serialize>(claims: &T, signer: &(impl Signer + ?Sized)) -> Result<String, CryptoError> {
    let header = Header {
        alg: signer.algorithm().as_str().to_string(),
        typ: Some(TYP_JWT.to_string()),
        kid: signer.key_id().to_string(),
    };
    let header = CanonicalBytes::new(&header)?;
    let payload = CanonicalBytes::new(claims)?;
    let input = SigningInput::from_canonical(&header, &payload);

    let signature = signer.try_sign(&input)?;
    tracing::trace!(kid = signer.key_id(), "signed token");
    Ok(format!(
        "{}.{}",
        input.as_str(),
        Base64UrlUnpadded::encode_string(signature.as_bytes())
    ))
}

/// Decode a token without checking its signature.
///
/// For inspection and for reading back values from a token this process
/// just produced. Never use the result for an access decision.
pub fn decode_unverified<T: DeserializeOwned>(token: &str) -> Result<Jwt<T>, CryptoError> {
    let parts = Parts::parse(token)?;
    let claims = parts.claims()?;
    Ok(Jwt {
        header: parts.header,
        claims,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ed25519;
    use crate::signer::KeySigner;
    use serde_json::{json, Value};

    #[test]
    fn encode_produces_three_segments_with_canonical_payload() {
        let signer = KeySigner::from_seed(&[3u8; 32]);
        let token = encode(&json!({"sub": "b", "iss": "a"}), &signer).unwrap();
        let segments: Vec<&str> = token.split('.').collect();
        assert_eq!(segments.len(), 3);
        let payload = Base64UrlUnpadded::decode_vec(segments[1]).unwrap();
        assert_eq!(payload, br#"{"iss":"a","sub":"b"}"#);
    }

    #[test]
    fn header_names_algorithm_type_and_key() {
        let signer = KeySigner::generate();
        let token = encode(&json!({"iss": signer.did()}), &signer).unwrap();
        let jwt: Jwt<Value> = decode_unverified(&token).unwrap();
        assert_eq!(jwt.header.alg, "EdDSA");
        assert_eq!(jwt.header.typ.as_deref(), Some("JWT"));
        assert_eq!(jwt.header.kid, signer.key_id());
    }

    #[test]
    fn signature_covers_received_segments() {
        let signer = KeySigner::generate();
        let token = encode(&json!({"n": 1}), &signer).unwrap();
        let parts = Parts::parse(&token).unwrap();
        ed25519::verify(&parts.signing_input, &parts.signature, &signer.public_key())
            .expect("signature should verify");
    }

    #[test]
    fn float_claims_are_rejected() {
        let signer = KeySigner::generate();
        assert!(matches!(
            encode(&json!({"exp": 1.5}), &signer),
            Err(CryptoError::Canonicalization(_))
        ));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        for bad in ["", "a.b", "a.b.c.d", "!!.e30.AA", "e30.e30.AA"] {
            assert!(
                matches!(decode_unverified::<Value>(bad), Err(CryptoError::MalformedToken(_))),
                "{bad:?} should be malformed"
            );
        }
    }
}
