//! # Claim Values
//!
//! Credential subjects are arbitrarily nested: mappings whose values are
//! scalars, nested mappings, or ordered sequences of mappings (role lists,
//! localized names). [`ClaimValue`] models that tree as a closed variant so
//! every traversal is an exhaustive `match` rather than probing an untyped
//! JSON value.
//!
//! The serde representation is plain JSON: `Scalar`, `Sequence`, and
//! `Mapping` serialize as JSON scalars, arrays, and objects respectively.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A credential subject: claim names to claim values.
pub type ClaimSet = BTreeMap<String, ClaimValue>;

/// A leaf claim value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// JSON `null`.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON number.
    Number(serde_json::Number),
    /// JSON string.
    Text(String),
}

/// A node in a nested claim tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    /// A leaf value.
    Scalar(Scalar),
    /// An ordered sequence, e.g. a role list.
    Sequence(Vec<ClaimValue>),
    /// A nested mapping.
    Mapping(ClaimSet),
}

impl ClaimValue {
    /// A text scalar.
    pub fn text(s: impl Into<String>) -> Self {
        ClaimValue::Scalar(Scalar::Text(s.into()))
    }

    /// A mapping built from `(name, value)` pairs.
    pub fn mapping<K: Into<String>>(entries: impl IntoIterator<Item = (K, ClaimValue)>) -> Self {
        ClaimValue::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// The string content if this is a text scalar.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ClaimValue::Scalar(Scalar::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// The entries if this is a sequence.
    pub fn as_sequence(&self) -> Option<&[ClaimValue]> {
        match self {
            ClaimValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// The entries if this is a mapping.
    pub fn as_mapping(&self) -> Option<&ClaimSet> {
        match self {
            ClaimValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when this is a mapping.
    pub fn get(&self, key: &str) -> Option<&ClaimValue> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Depth-first search for the first sequence stored under `key`.
    ///
    /// Mapping entries are visited in key order and sequence elements in
    /// order, so the result is deterministic for a given tree.
    pub fn find_sequence(&self, key: &str) -> Option<&[ClaimValue]> {
        match self {
            ClaimValue::Scalar(_) => None,
            ClaimValue::Sequence(items) => items.iter().find_map(|v| v.find_sequence(key)),
            ClaimValue::Mapping(map) => find_sequence_in(map, key),
        }
    }
}

/// Depth-first search for a sequence under `key` in a claim set.
pub fn find_sequence_in<'a>(claims: &'a ClaimSet, key: &str) -> Option<&'a [ClaimValue]> {
    if let Some(ClaimValue::Sequence(items)) = claims.get(key) {
        return Some(items);
    }
    claims.values().find_map(|v| v.find_sequence(key))
}

/// A `{value, lang}` pair, the shape of organization names and role names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalizedName {
    /// The text.
    pub value: String,
    /// BCP 47 language tag.
    pub lang: String,
}

impl LocalizedName {
    /// Build a localized name.
    pub fn new(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            lang: lang.into(),
        }
    }

    /// The claim tree form: a mapping with exactly `value` and `lang`.
    pub fn to_claim(&self) -> ClaimValue {
        ClaimValue::mapping([
            ("value", ClaimValue::text(self.value.clone())),
            ("lang", ClaimValue::text(self.lang.clone())),
        ])
    }

    /// Read a localized name back out of a claim node.
    ///
    /// Returns `None` unless the node is a mapping with exactly the two text
    /// fields `value` and `lang`. Extra fields make it a different claim.
    pub fn from_claim(claim: &ClaimValue) -> Option<Self> {
        let map = claim.as_mapping()?;
        if map.len() != 2 {
            return None;
        }
        Some(Self::new(
            map.get("value")?.as_text()?,
            map.get("lang")?.as_text()?,
        ))
    }

    /// Structural, field-by-field equality against a claim node.
    pub fn matches(&self, claim: &ClaimValue) -> bool {
        Self::from_claim(claim).as_ref() == Some(self)
    }
}

impl std::fmt::Display for LocalizedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.value, self.lang)
    }
}
