//! # vcgate-core: Foundational Types
//!
//! The leaf crate of the vcgate workspace. Every other crate depends on it;
//! it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Tagged claim values.** Credential subjects are [`ClaimSet`]s built
//!    from [`ClaimValue`] (`Scalar | Sequence | Mapping`), never an untyped
//!    `serde_json::Value`. Claim traversal is an exhaustive `match`.
//!
//! 2. **`CanonicalBytes` newtype.** Token payloads are serialized through
//!    `CanonicalBytes::new()` (RFC 8785 / JCS), so the same claims always
//!    produce the same signed bytes.
//!
//! 3. **UTC-only timestamps.** [`Timestamp`] renders `YYYY-MM-DDTHH:MM:SSZ`
//!    and is the only way issuance dates are produced.
//!
//! 4. **Validated identifiers.** [`Did`] rejects strings that are not
//!    `did:<method>:<method-specific-id>`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `vcgate-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod claim;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use claim::{find_sequence_in, ClaimSet, ClaimValue, LocalizedName, Scalar};
pub use error::{CanonicalizationError, CoreError, CryptoError, ResolutionError};
pub use identity::Did;
pub use temporal::Timestamp;
