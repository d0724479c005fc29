//! # Scenario Configuration
//!
//! Loaded from YAML via `--config`. Every field has a default, so an empty
//! file reproduces the built-in scenarios:
//!
//! ```yaml
//! identity_organization: XYZ University
//! membership_role: { value: Teaching Assistant, lang: en }
//! token_policy:
//!   leeway_secs: 5
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use vcgate_core::LocalizedName;
use vcgate_vc::{required_role, TokenPolicy};

/// Roles on the combined credential, besides the access role.
const COMBINED_EXTRA_ROLES: [&str; 19] = [
    "Hiking Group",
    "Group1",
    "Group2",
    "Group3",
    "Group4",
    "Group5",
    "Group6",
    "Group2",
    "Group3",
    "Hiking Group5",
    "Hiking Group6",
    "Hiking Group2",
    "Hiking Group3",
    "Hiking Group5",
    "Hiking Group6",
    "Hiking Group2",
    "Hiking Group3",
    "Hiking Group5",
    "Hiking Group6",
];

/// Inputs to the demo scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Presentation definition id.
    pub request_id: String,
    /// Organization named on the identity credential.
    pub identity_organization: String,
    /// Organization named on the combined credential.
    pub combined_organization: String,
    /// Role the issuer puts on the membership credential.
    pub membership_role: LocalizedName,
    /// Roles the issuer puts on the combined credential.
    pub combined_roles: Vec<LocalizedName>,
    /// Token lifetimes and clock leeway.
    pub token_policy: TokenPolicy,
}

impl Default for DemoConfig {
    fn default() -> Self {
        let mut combined_roles = vec![required_role()];
        combined_roles.extend(
            COMBINED_EXTRA_ROLES
                .iter()
                .map(|value| LocalizedName::new(*value, "fr")),
        );
        Self {
            request_id: "test-id".to_string(),
            identity_organization: "XYZ University".to_string(),
            combined_organization: "Example University".to_string(),
            membership_role: required_role(),
            combined_roles,
            token_policy: TokenPolicy::default(),
        }
    }
}

impl DemoConfig {
    /// Read a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("invalid config: {}", path.display()))
    }

    /// Parse a YAML configuration document. An empty document is the default.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Replace the granted role: the membership role, and the access role
    /// in the combined list.
    pub fn with_role(mut self, role: LocalizedName) -> Self {
        let access = required_role();
        for existing in self.combined_roles.iter_mut().filter(|r| **r == access) {
            *existing = role.clone();
        }
        self.membership_role = role;
        self
    }
}

/// Parse a `VALUE[@LANG]` role argument. The language defaults to `en`.
pub fn parse_role(arg: &str) -> Result<LocalizedName, String> {
    let (value, lang) = match arg.rsplit_once('@') {
        Some((value, lang)) => (value, lang),
        None => (arg, "en"),
    };
    if value.trim().is_empty() || lang.trim().is_empty() {
        return Err(format!("role must be VALUE[@LANG], got {arg:?}"));
    }
    Ok(LocalizedName::new(value, lang))
}
