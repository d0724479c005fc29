//! # Tamper Detection
//!
//! Replacing any single character of a signed token, with another base64url
//! character or a segment separator, must make verification fail with a
//! signature error: never a grant, never a resolution error, never a panic.

use std::sync::{Arc, OnceLock};

use proptest::prelude::*;
use vcgate_core::{LocalizedName, Timestamp};
use vcgate_crypto::{DidKeyResolver, KeySigner, Resolver, Signer, Verifier};
use vcgate_vc::{
    build_credential, build_presentation_request, build_presentation_submission, required_role,
    verify_credential, verify_presentation, CredentialShape, RequestShape, VcError,
};

const REPLACEMENTS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_.";

struct Fixture {
    resolver: Arc<dyn Resolver>,
    rp_verifier: Verifier,
    /// Identity, membership and combined credentials.
    credentials: [String; 3],
    presentation: String,
}

fn fixture() -> &'static Fixture {
    static FIXTURE: OnceLock<Fixture> = OnceLock::new();
    FIXTURE.get_or_init(|| {
        let issuer = KeySigner::generate();
        let holder = KeySigner::generate();
        let rp = KeySigner::generate();
        let resolver: Arc<dyn Resolver> = Arc::new(DidKeyResolver);

        let issue = |shape: CredentialShape| build_credential(&shape, &issuer, holder.did()).unwrap().1;
        let credentials = [
            issue(CredentialShape::Identity {
                organization: "XYZ University".into(),
            }),
            issue(CredentialShape::Membership {
                role: required_role(),
            }),
            issue(CredentialShape::Combined {
                organization: "Example University".into(),
                roles: vec![required_role(), LocalizedName::new("Group1", "fr")],
            }),
        ];

        let shape = RequestShape::Combined {
            identity_descriptor_id: "id-1".into(),
            membership_descriptor_id: "id-2".into(),
        };
        let request =
            build_presentation_request("test-id", &shape, issuer.did().as_str(), &rp, holder.did()).unwrap();
        let requester = Verifier::new(holder.did().clone(), resolver.clone());
        let presentation = build_presentation_submission(
            &request,
            &requester,
            &holder,
            &[credentials[0].clone(), credentials[1].clone()],
        )
        .unwrap();

        Fixture {
            rp_verifier: Verifier::new(rp.did().clone(), resolver.clone()),
            resolver,
            credentials,
            presentation,
        }
    })
}

/// Replace the character at `index` with `replacement`, or `None` if that
/// would leave the token unchanged.
fn tamper(token: &str, index: usize, replacement: u8) -> Option<String> {
    let mut bytes = token.as_bytes().to_vec();
    let index = index % bytes.len();
    if bytes[index] == replacement {
        return None;
    }
    bytes[index] = replacement;
    String::from_utf8(bytes).ok()
}

#[test]
fn untampered_tokens_verify() {
    let f = fixture();
    for token in &f.credentials {
        assert!(verify_credential(token, f.resolver.as_ref(), 0, Timestamp::now()).is_ok());
    }
    assert!(verify_presentation(&f.rp_verifier, f.resolver.as_ref(), &f.presentation).is_ok());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(192))]

    #[test]
    fn tampered_credential_fails_signature(
        which in 0usize..3,
        index in any::<usize>(),
        replacement in prop::sample::select(REPLACEMENTS),
    ) {
        let f = fixture();
        let tampered = tamper(&f.credentials[which], index, replacement);
        prop_assume!(tampered.is_some());
        let result = verify_credential(
            tampered.as_deref().unwrap_or_default(),
            f.resolver.as_ref(),
            0,
            Timestamp::now(),
        );
        prop_assert!(matches!(result, Err(VcError::Signature(_))), "got {:?}", result.err());
    }

    #[test]
    fn tampered_presentation_fails_signature(
        index in any::<usize>(),
        replacement in prop::sample::select(REPLACEMENTS),
    ) {
        let f = fixture();
        let tampered = tamper(&f.presentation, index, replacement);
        prop_assume!(tampered.is_some());
        let result = verify_presentation(
            &f.rp_verifier,
            f.resolver.as_ref(),
            tampered.as_deref().unwrap_or_default(),
        );
        prop_assert!(matches!(result, Err(VcError::Signature(_))), "got {:?}", result.err());
    }
}
