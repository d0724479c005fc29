//! # Credential Shapes
//!
//! The three claim layouts an issuer can attest:
//!
//! | Shape        | Types                                       | Subject                                         |
//! |--------------|---------------------------------------------|-------------------------------------------------|
//! | `Identity`   | `VerifiableCredential`, `AlumniCredential`  | `alumniOf { id, name: [{value, lang}] }`        |
//! | `Combined`   | `VerifiableCredential`, `AlumniCredential`  | `alumniOf { id, name, roles: [{value, lang}*] }` |
//! | `Membership` | `VerifiableCredential`, `AlumniMemberCredential` | `IdentityReference { id, roles: [{value, lang}] }` |
//!
//! A relying party either asks for one `Combined` credential, or for an
//! `Identity` plus a `Membership` credential linked through the subject DID.

use vcgate_core::{ClaimSet, ClaimValue, Did, LocalizedName};

use crate::credential::{BASE_CONTEXT, BASE_TYPE};

/// Context URI of the W3C examples vocabulary (`alumniOf`).
pub const EXAMPLES_CONTEXT: &str = "https://www.w3.org/2018/credentials/examples/v1";

/// Domain type of identity and combined credentials.
pub const ALUMNI_CREDENTIAL: &str = "AlumniCredential";

/// Domain type of membership credentials.
pub const ALUMNI_MEMBER_CREDENTIAL: &str = "AlumniMemberCredential";

/// Language tag of organization names.
const ORGANIZATION_LANG: &str = "en";

/// The claim layout of a credential to issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialShape {
    /// Names the organization the subject is an alumnus of.
    Identity {
        /// Organization name.
        organization: String,
    },
    /// Identity plus every role the subject holds, in one credential.
    Combined {
        /// Organization name.
        organization: String,
        /// Role names, in order. Duplicates allowed.
        roles: Vec<LocalizedName>,
    },
    /// Exactly one role, referencing the subject.
    Membership {
        /// The role.
        role: LocalizedName,
    },
}

impl CredentialShape {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            CredentialShape::Identity { .. } => "identity",
            CredentialShape::Combined { .. } => "combined",
            CredentialShape::Membership { .. } => "membership",
        }
    }

    /// Fixed JSON-LD context.
    pub fn context(&self) -> Vec<String> {
        vec![BASE_CONTEXT.to_string(), EXAMPLES_CONTEXT.to_string()]
    }

    /// The credential `id`.
    pub fn credential_id(&self) -> &'static str {
        match self {
            CredentialShape::Identity { .. } | CredentialShape::Combined { .. } => {
                "http://example.edu/credentials/1872"
            }
            CredentialShape::Membership { .. } => "http://example.edu/credentials/18723",
        }
    }

    /// The domain type tag.
    pub fn domain_type(&self) -> &'static str {
        match self {
            CredentialShape::Identity { .. } | CredentialShape::Combined { .. } => ALUMNI_CREDENTIAL,
            CredentialShape::Membership { .. } => ALUMNI_MEMBER_CREDENTIAL,
        }
    }

    /// The credential `type`: base tag then domain tag.
    pub fn types(&self) -> Vec<String> {
        vec![BASE_TYPE.to_string(), self.domain_type().to_string()]
    }

    /// The credential subject for `subject`.
    pub fn subject(&self, subject: &Did) -> ClaimSet {
        let id = || ClaimValue::text(subject.as_str());
        let organization_name = |organization: &str| {
            ClaimValue::Sequence(vec![
                LocalizedName::new(organization, ORGANIZATION_LANG).to_claim(),
            ])
        };
        let role_list =
            |roles: &[LocalizedName]| ClaimValue::Sequence(roles.iter().map(LocalizedName::to_claim).collect());

        match self {
            CredentialShape::Identity { organization } => ClaimSet::from([
                ("id".to_string(), id()),
                (
                    "alumniOf".to_string(),
                    ClaimValue::mapping([("id", id()), ("name", organization_name(organization))]),
                ),
            ]),
            CredentialShape::Combined {
                organization,
                roles,
            } => ClaimSet::from([
                ("id".to_string(), id()),
                (
                    "alumniOf".to_string(),
                    ClaimValue::mapping([
                        ("id", id()),
                        ("name", organization_name(organization)),
                        ("roles", role_list(roles)),
                    ]),
                ),
            ]),
            CredentialShape::Membership { role } => ClaimSet::from([(
                "IdentityReference".to_string(),
                ClaimValue::mapping([("id", id()), ("roles", role_list(std::slice::from_ref(role)))]),
            )]),
        }
    }
}
