//! Credential issuance: build, validate, sign.

use uuid::Uuid;
use vcgate_core::{Did, Timestamp};
use vcgate_crypto::{jws, RegisteredClaims, Signer};

use crate::credential::{parse_credential, CredentialClaims, CredentialJwtClaims, VerifiableCredential};
use crate::error::VcError;
use crate::shape::CredentialShape;

/// Issue a credential of `shape` about `subject`, signed by `issuer`.
///
/// Returns `(credential_id, signed_token)`, where `credential_id` is the
/// `jti` read back out of the signed token.
///
/// # Errors
///
/// - `SchemaValidation` if the assembled credential is not well formed.
/// - `Canonicalization` / `Signature` if signing fails.
pub fn build_credential(
    shape: &CredentialShape,
    issuer: &dyn Signer,
    subject: &Did,
) -> Result<(String, String), VcError> {
    build_credential_at(shape, issuer, subject, Timestamp::now())
}

/// [`build_credential`] with an explicit issuance instant.
pub fn build_credential_at(
    shape: &CredentialShape,
    issuer: &dyn Signer,
    subject: &Did,
    issued_at: Timestamp,
) -> Result<(String, String), VcError> {
    let vc = VerifiableCredential {
        context: shape.context(),
        id: shape.credential_id().to_string(),
        credential_type: shape.types(),
        issuer: issuer.did().to_string(),
        issuance_date: issued_at.to_iso8601(),
        credential_subject: shape.subject(subject),
    };
    vc.validate()?;
    tracing::debug!(credential = %serde_json::to_string(&vc)?, "assembled credential");

    let claims: CredentialJwtClaims = CredentialJwtClaims {
        registered: RegisteredClaims::new(issuer.did())
            .subject(subject.as_str())
            .id(format!("urn:uuid:{}", Uuid::new_v4()))
            .issued_at(issued_at),
        body: CredentialClaims { vc },
    };
    let token = jws::encode(&claims, issuer).map_err(VcError::from_signing)?;

    let credential_id = parse_credential(&token)?
        .registered
        .jti
        .ok_or_else(|| VcError::SchemaValidation("signed credential has no jti".into()))?;

    tracing::info!(
        shape = shape.name(),
        issuer = %issuer.did(),
        subject = %subject,
        %credential_id,
        "credential issued"
    );
    Ok((credential_id, token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vcgate_core::LocalizedName;
    use vcgate_crypto::KeySigner;

    fn shapes() -> Vec<CredentialShape> {
        vec![
            CredentialShape::Identity {
                organization: "XYZ University".into(),
            },
            CredentialShape::Combined {
                organization: "Example University".into(),
                roles: vec![
                    LocalizedName::new("Teaching Assistant", "en"),
                    LocalizedName::new("Hiking Group", "fr"),
                ],
            },
            CredentialShape::Membership {
                role: LocalizedName::new("Teaching Assistant", "en"),
            },
        ]
    }

    #[test]
    fn issued_token_carries_shape_subject() {
        let issuer = KeySigner::generate();
        let student = KeySigner::generate();
        for shape in shapes() {
            let (id, token) = build_credential(&shape, &issuer, student.did()).unwrap();
            let claims = parse_credential(&token).unwrap();
            assert_eq!(claims.registered.jti.as_deref(), Some(id.as_str()));
            assert_eq!(&claims.registered.iss, issuer.did());
            assert_eq!(claims.registered.sub.as_deref(), Some(student.did().as_str()));
            assert_eq!(claims.body.vc.credential_subject, shape.subject(student.did()));
            assert_eq!(claims.body.vc.issuer, issuer.did().to_string());
        }
    }

    #[test]
    fn credential_id_differs_from_vc_id_and_between_issuances() {
        let issuer = KeySigner::generate();
        let student = KeySigner::generate();
        let shape = &shapes()[0];
        let (a, _) = build_credential(shape, &issuer, student.did()).unwrap();
        let (b, _) = build_credential(shape, &issuer, student.did()).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, shape.credential_id());
        assert!(a.starts_with("urn:uuid:"));
    }

    #[test]
    fn issuance_date_uses_given_instant() {
        let issuer = KeySigner::generate();
        let student = KeySigner::generate();
        let at = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let (_, token) = build_credential_at(&shapes()[2], &issuer, student.did(), at).unwrap();
        let claims = parse_credential(&token).unwrap();
        assert_eq!(claims.body.vc.issuance_date, "2026-01-15T12:00:00Z");
        assert_eq!(claims.registered.iat, Some(at.epoch_secs()));
    }
}
