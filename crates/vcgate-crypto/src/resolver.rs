//! # Key Resolution
//!
//! A [`Resolver`] maps a DID to the Ed25519 public key that verifies its
//! tokens. Verifiers hold resolvers behind `Arc<dyn Resolver>`, so every
//! implementation is `Send + Sync`.
//!
//! - [`DidKeyResolver`](crate::DidKeyResolver) decodes `did:key` DIDs.
//! - [`StaticResolver`] serves keys registered up front.
//! - [`ResolverChain`] tries several resolvers in order.
//! - [`CachingResolver`] memoizes any resolver's successes.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use vcgate_core::{Did, ResolutionError};

use crate::ed25519::Ed25519PublicKey;

/// Maps an identifier to its current verification key.
pub trait Resolver: Send + Sync {
    /// Resolve the verification key for `did`.
    ///
    /// # Errors
    ///
    /// - `UnsupportedMethod` if this resolver does not handle the DID method.
    /// - `NotFound` if the method is handled but no key is known.
    /// - `InvalidDid` if the identifier cannot encode a key.
    fn resolve(&self, did: &Did) -> Result<Ed25519PublicKey, ResolutionError>;
}

impl<R: Resolver + ?Sized> Resolver for &R {
    fn resolve(&self, did: &Did) -> Result<Ed25519PublicKey, ResolutionError> {
        (**self).resolve(did)
    }
}

impl<R: Resolver + ?Sized> Resolver for Arc<R> {
    fn resolve(&self, did: &Did) -> Result<Ed25519PublicKey, ResolutionError> {
        (**self).resolve(did)
    }
}

impl<R: Resolver + ?Sized> Resolver for Box<R> {
    fn resolve(&self, did: &Did) -> Result<Ed25519PublicKey, ResolutionError> {
        (**self).resolve(did)
    }
}

// ---------------------------------------------------------------------------
// StaticResolver
// ---------------------------------------------------------------------------

/// A fixed DID-to-key table.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    keys: HashMap<Did, Ed25519PublicKey>,
}

impl StaticResolver {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key, replacing any earlier key for the same DID.
    pub fn with_key(mut self, did: Did, key: Ed25519PublicKey) -> Self {
        self.keys.insert(did, key);
        self
    }

    /// Register a key in place.
    pub fn insert(&mut self, did: Did, key: Ed25519PublicKey) {
        self.keys.insert(did, key);
    }
}

impl Resolver for StaticResolver {
    fn resolve(&self, did: &Did) -> Result<Ed25519PublicKey, ResolutionError> {
        self.keys
            .get(did)
            .cloned()
            .ok_or_else(|| ResolutionError::NotFound(did.to_string()))
    }
}

// ---------------------------------------------------------------------------
// ResolverChain
// ---------------------------------------------------------------------------

/// Tries each resolver in order and returns the first key found.
///
/// A resolver answering `UnsupportedMethod` is skipped. Any other error
/// from a resolver that does handle the method is returned as-is.
#[derive(Default)]
pub struct ResolverChain {
    resolvers: Vec<Box<dyn Resolver>>,
}

impl ResolverChain {
    /// An empty chain, which supports no method.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resolver.
    pub fn with(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }
}

impl Resolver for ResolverChain {
    fn resolve(&self, did: &Did) -> Result<Ed25519PublicKey, ResolutionError> {
        for resolver in &self.resolvers {
            match resolver.resolve(did) {
                Err(ResolutionError::UnsupportedMethod(_)) => continue,
                other => return other,
            }
        }
        Err(ResolutionError::UnsupportedMethod(did.method().to_string()))
    }
}

impl std::fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverChain")
            .field("len", &self.resolvers.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// CachingResolver
// ---------------------------------------------------------------------------

/// Memoizes successful resolutions of an inner resolver.
///
/// Failures are not cached, so a key registered later is picked up on the
/// next lookup.
#[derive(Debug)]
pub struct CachingResolver<R> {
    inner: R,
    cache: DashMap<Did, Ed25519PublicKey>,
}

impl<R: Resolver> CachingResolver<R> {
    /// Wrap `inner` with an empty cache.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
        }
    }

    /// Number of cached entries.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl<R: Resolver> Resolver for CachingResolver<R> {
    fn resolve(&self, did: &Did) -> Result<Ed25519PublicKey, ResolutionError> {
        if let Some(key) = self.cache.get(did) {
            return Ok(key.value().clone());
        }
        let key = self.inner.resolve(did)?;
        tracing::trace!(%did, "caching resolved key");
        self.cache.insert(did.clone(), key.clone());
        Ok(key)
    }
}
