//! # Demo Entities
//!
//! A party in the scenario: a display name, an Ed25519 `did:key` identity,
//! and an in-memory credential wallet. Nothing is persisted.

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use vcgate_core::Did;
use vcgate_crypto::{KeySigner, Signer};

/// Credential tokens held by one party, keyed by credential id.
#[derive(Debug, Default)]
pub struct CredentialWallet {
    credentials: BTreeMap<String, String>,
}

impl CredentialWallet {
    /// Store a credential token. A second credential with the same id is
    /// refused.
    pub fn add(&mut self, id: &str, token: String) -> Result<()> {
        if self.credentials.contains_key(id) {
            bail!("wallet already holds credential {id}");
        }
        self.credentials.insert(id.to_string(), token);
        Ok(())
    }

    /// The token stored under `id`.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.credentials.get(id).map(String::as_str)
    }

    /// Number of credentials held.
    pub fn size(&self) -> usize {
        self.credentials.len()
    }
}

/// A named party with its own key and wallet.
#[derive(Debug)]
pub struct Entity {
    name: String,
    signer: KeySigner,
    wallet: CredentialWallet,
}

impl Entity {
    /// Create a party with a freshly generated key.
    pub fn new(name: &str) -> Self {
        let signer = KeySigner::generate();
        tracing::debug!(name, did = %signer.did(), "entity initialized");
        Self {
            name: name.to_string(),
            signer,
            wallet: CredentialWallet::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn did(&self) -> &Did {
        self.signer.did()
    }

    pub fn signer(&self) -> &KeySigner {
        &self.signer
    }

    pub fn wallet(&self) -> &CredentialWallet {
        &self.wallet
    }

    pub fn wallet_mut(&mut self) -> &mut CredentialWallet {
        &mut self.wallet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_counts_and_returns_credentials() {
        let mut wallet = CredentialWallet::default();
        assert_eq!(wallet.size(), 0);
        wallet.add("urn:uuid:1", "a.b.c".into()).unwrap();
        wallet.add("urn:uuid:2", "d.e.f".into()).unwrap();
        assert_eq!(wallet.size(), 2);
        assert_eq!(wallet.get("urn:uuid:2"), Some("d.e.f"));
        assert_eq!(wallet.get("urn:uuid:3"), None);
    }

    #[test]
    fn wallet_refuses_duplicate_id() {
        let mut wallet = CredentialWallet::default();
        wallet.add("urn:uuid:1", "a.b.c".into()).unwrap();
        assert!(wallet.add("urn:uuid:1", "x.y.z".into()).is_err());
        assert_eq!(wallet.get("urn:uuid:1"), Some("a.b.c"));
    }

    #[test]
    fn entities_get_distinct_did_keys() {
        let student = Entity::new("Student");
        let employer = Entity::new("Employer");
        assert_eq!(student.name(), "Student");
        assert_eq!(student.did().method(), "key");
        assert_ne!(student.did(), employer.did());
        assert_eq!(student.wallet().size(), 0);
    }
}
