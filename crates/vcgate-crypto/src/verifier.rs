//! # Token Verification
//!
//! [`verify_token`] is the one path by which a token's claims become
//! trusted. It checks, in order:
//!
//! 1. The token is a well-formed compact JWS with an `EdDSA` header.
//! 2. The DID behind the header `kid` equals the `iss` claim.
//! 3. The resolver yields a key for that DID.
//! 4. The signature verifies over the received segments.
//! 5. `exp`, `nbf` and `iat` hold at the verification instant, within leeway.
//! 6. If an audience is expected, `aud` contains it.
//!
//! Step 2 runs before any key lookup, so a token whose header was altered
//! fails as an issuer mismatch instead of resolving a stranger's key.
//!
//! A [`Verifier`] bundles a resolver with the audience and leeway of one
//! party, e.g. a relying party checking presentations addressed to it.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use vcgate_core::{CryptoError, Did, Timestamp};

use crate::claims::JwtClaims;
use crate::ed25519;
use crate::jws::{Jwt, Parts};
use crate::resolver::Resolver;
use crate::signer::Algorithm;

/// What a token must satisfy beyond a valid signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    /// Required `aud` entry, if any.
    pub audience: Option<Did>,
    /// Clock skew tolerated on `exp`, `nbf` and `iat`, in seconds.
    pub leeway_secs: u64,
}

/// Verify a token and return its trusted claims.
///
/// # Errors
///
/// - `MalformedToken` / `UnsupportedAlgorithm` for step 1.
/// - `IssuerMismatch` for step 2.
/// - `Resolution` for step 3.
/// - `KeyError` / `VerificationFailed` for step 4.
/// - `Expired` / `NotYetValid` for step 5.
/// - `AudienceMismatch` for step 6.
pub fn verify_token<T: DeserializeOwned>(
    token: &str,
    resolver: &dyn Resolver,
    validation: &Validation,
    now: Timestamp,
) -> Result<Jwt<JwtClaims<T>>, CryptoError> {
    let parts = Parts::parse(token)?;
    if parts.header.alg != Algorithm::EdDSA.as_str() {
        return Err(CryptoError::UnsupportedAlgorithm(parts.header.alg.clone()));
    }
    let claims: JwtClaims<T> = parts.claims()?;

    let signer = Did::from_did_url(&parts.header.kid)
        .map_err(|e| CryptoError::MalformedToken(format!("kid is not a DID URL: {e}")))?;
    if signer != claims.registered.iss {
        return Err(CryptoError::IssuerMismatch {
            iss: claims.registered.iss.to_string(),
            signer: signer.to_string(),
        });
    }

    let key = resolver.resolve(&signer)?;
    ed25519::verify(&parts.signing_input, &parts.signature, &key)?;

    check_times(&claims, validation.leeway_secs, now)?;

    if let Some(expected) = &validation.audience {
        let aud = claims.registered.aud.as_ref();
        if !aud.is_some_and(|aud| aud.contains(expected.as_str())) {
            return Err(CryptoError::AudienceMismatch {
                expected: expected.to_string(),
                found: aud.map(|aud| aud.to_vec()).unwrap_or_default(),
            });
        }
    }

    tracing::debug!(iss = %claims.registered.iss, "token verified");
    Ok(Jwt {
        header: parts.header,
        claims,
    })
}

fn check_times<T>(claims: &JwtClaims<T>, leeway_secs: u64, now: Timestamp) -> Result<(), CryptoError> {
    let now = now.epoch_secs();
    let leeway = i64::try_from(leeway_secs).unwrap_or(i64::MAX);
    let registered = &claims.registered;

    if let Some(exp) = registered.exp {
        if now > exp.saturating_add(leeway) {
            return Err(CryptoError::Expired { exp, now });
        }
    }
    for nbf in [registered.nbf, registered.iat].into_iter().flatten() {
        if nbf > now.saturating_add(leeway) {
            return Err(CryptoError::NotYetValid { nbf, now });
        }
    }
    Ok(())
}

/// A verification capability: a key source plus one party's expectations.
#[derive(Clone)]
pub struct Verifier {
    resolver: Arc<dyn Resolver>,
    validation: Validation,
}

impl Verifier {
    /// A verifier that only accepts tokens addressed to `audience`.
    pub fn new(audience: Did, resolver: Arc<dyn Resolver>) -> Self {
        Self {
            resolver,
            validation: Validation {
                audience: Some(audience),
                leeway_secs: 0,
            },
        }
    }

    /// A verifier that ignores `aud`, for tokens without a recipient.
    pub fn any_audience(resolver: Arc<dyn Resolver>) -> Self {
        Self {
            resolver,
            validation: Validation::default(),
        }
    }

    /// Tolerate `secs` of clock skew.
    pub fn with_leeway(mut self, secs: u64) -> Self {
        self.validation.leeway_secs = secs;
        self
    }

    /// The audience this verifier is bound to.
    pub fn audience(&self) -> Option<&Did> {
        self.validation.audience.as_ref()
    }

    /// Tolerated clock skew in seconds.
    pub fn leeway_secs(&self) -> u64 {
        self.validation.leeway_secs
    }

    /// The key source.
    pub fn resolver(&self) -> &dyn Resolver {
        self.resolver.as_ref()
    }

    /// Verify a token now.
    pub fn verify<T: DeserializeOwned>(&self, token: &str) -> Result<Jwt<JwtClaims<T>>, CryptoError> {
        self.verify_at(token, Timestamp::now())
    }

    /// Verify a token as of `now`.
    pub fn verify_at<T: DeserializeOwned>(
        &self,
        token: &str,
        now: Timestamp,
    ) -> Result<Jwt<JwtClaims<T>>, CryptoError> {
        verify_token(token, self.resolver.as_ref(), &self.validation, now)
    }
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verifier")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}
