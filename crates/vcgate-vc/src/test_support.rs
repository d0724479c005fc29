//! Three-party fixtures for unit tests.

use std::sync::Arc;

use vcgate_core::LocalizedName;
use vcgate_crypto::{DidKeyResolver, KeySigner, Resolver, Signer, Verifier};

use crate::issuance::build_credential;
use crate::request::{build_presentation_request, RequestShape};
use crate::shape::CredentialShape;
use crate::submission::build_presentation_submission;

pub(crate) struct Parties {
    pub(crate) issuer: KeySigner,
    pub(crate) holder: KeySigner,
    pub(crate) rp: KeySigner,
    pub(crate) resolver: Arc<dyn Resolver>,
}

impl Parties {
    pub(crate) fn new() -> Self {
        Self {
            issuer: KeySigner::generate(),
            holder: KeySigner::generate(),
            rp: KeySigner::generate(),
            resolver: Arc::new(DidKeyResolver),
        }
    }

    pub(crate) fn issue(&self, shape: &CredentialShape) -> String {
        build_credential(shape, &self.issuer, self.holder.did()).unwrap().1
    }

    /// Request, answer and return the presentation token.
    pub(crate) fn present(&self, shape: &RequestShape, tokens: &[String]) -> String {
        let request = build_presentation_request(
            "test-id",
            shape,
            self.issuer.did().as_str(),
            &self.rp,
            self.holder.did(),
        )
        .unwrap();
        let requester = Verifier::new(self.holder.did().clone(), self.resolver.clone());
        build_presentation_submission(&request, &requester, &self.holder, tokens).unwrap()
    }

    pub(crate) fn rp_verifier(&self) -> Verifier {
        Verifier::new(self.rp.did().clone(), self.resolver.clone())
    }
}

pub(crate) fn linked() -> RequestShape {
    RequestShape::Combined {
        identity_descriptor_id: "id-1".into(),
        membership_descriptor_id: "id-2".into(),
    }
}

pub(crate) fn inline() -> RequestShape {
    RequestShape::Single {
        descriptor_id: "id-1".into(),
    }
}

pub(crate) fn identity() -> CredentialShape {
    CredentialShape::Identity {
        organization: "XYZ University".into(),
    }
}

pub(crate) fn membership(value: &str, lang: &str) -> CredentialShape {
    CredentialShape::Membership {
        role: LocalizedName::new(value, lang),
    }
}

pub(crate) fn combined(roles: &[(&str, &str)]) -> CredentialShape {
    CredentialShape::Combined {
        organization: "Example University".into(),
        roles: roles
            .iter()
            .map(|(value, lang)| LocalizedName::new(*value, *lang))
            .collect(),
    }
}
