//! # vcgate-vc: Credential Exchange and Access Decisions
//!
//! Implements the three-party credential flow:
//!
//! 1. **Issuance** ([`build_credential`]): an issuer attests one of three
//!    [`CredentialShape`]s about a subject and signs it as a JWT.
//! 2. **Request** ([`build_presentation_request`]): a relying party asks a
//!    holder for credentials from a given issuer, per [`RequestShape`].
//! 3. **Submission** ([`build_presentation_submission`]): the holder wraps
//!    credential tokens in a signed presentation.
//! 4. **Verification** ([`verify_presentation`]): the relying party checks
//!    the presentation and every embedded credential.
//! 5. **Access** ([`validate_access`]): the relying party looks for the
//!    required role and grants or denies.
//!
//! ## Crate Policy
//!
//! - Every token is produced by `vcgate_crypto::jws::encode` and every
//!   trusted claim comes out of `vcgate_crypto::verify_token`.
//! - Library code returns [`VcError`]; it never panics.

pub mod access;
pub mod credential;
pub mod error;
pub mod exchange;
pub mod issuance;
pub mod policy;
pub mod presentation;
pub mod request;
pub mod shape;
pub mod submission;
pub mod verify;

#[cfg(test)]
pub(crate) mod test_support;

pub use access::{required_role, validate_access, AccessDecision};
pub use credential::{parse_credential, verify_credential, VerifiableCredential};
pub use error::VcError;
pub use exchange::{PresentationDefinition, PresentationSubmission};
pub use issuance::build_credential;
pub use policy::TokenPolicy;
pub use presentation::VerifiablePresentation;
pub use request::{build_presentation_request, RequestShape};
pub use shape::CredentialShape;
pub use submission::build_presentation_submission;
pub use verify::{verify_presentation, VerifiedPresentation};
