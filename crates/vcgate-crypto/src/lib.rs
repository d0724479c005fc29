//! # vcgate-crypto: Signing Capabilities and Token Verification
//!
//! Provides the cryptographic layer for credential exchange:
//!
//! - **Ed25519** key pairs, signing and verification.
//! - **Compact JWS** encoding with canonical (JCS) header and payload bytes.
//! - **did:key** identifiers derived from Ed25519 public keys.
//! - **Resolvers** mapping DIDs to verification keys, with chaining and
//!   caching.
//! - **Verifier**: signature, issuer binding, validity window and audience
//!   checks in one call.
//!
//! ## Crate Policy
//!
//! - Depends only on `vcgate-core` internally.
//! - No mocking of cryptographic operations in tests; all tests use real
//!   Ed25519 keys and real tokens.

pub mod claims;
pub mod did_key;
pub mod ed25519;
pub mod jws;
pub mod resolver;
pub mod signer;
pub mod verifier;

pub use claims::{Audience, JwtClaims, RegisteredClaims};
pub use did_key::DidKeyResolver;
pub use ed25519::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
pub use jws::{Header, Jwt, SigningInput};
pub use resolver::{CachingResolver, Resolver, ResolverChain, StaticResolver};
pub use signer::{Algorithm, KeySigner, Signer};
pub use verifier::{verify_token, Validation, Verifier};
