//! # Presentation Exchange
//!
//! The DIF Presentation Exchange v2 objects that travel inside presentation
//! requests and presentations.
//!
//! - A [`PresentationDefinition`] lists the credentials a relying party
//!   requires, one [`InputDescriptor`] each.
//! - A [`PresentationSubmission`] maps each descriptor to the position of
//!   the credential that satisfies it.
//!
//! Specifications:
//! - <https://identity.foundation/presentation-exchange/spec/v2.0.0>
//! - <https://identity.foundation/jwt-vc-presentation-profile>

use serde::{Deserialize, Serialize};

/// Claim format designation for JWT-encoded credentials.
pub const FORMAT_JWT_VC: &str = "jwt_vc";

/// A relying party's statement of required proofs.
///
/// <https://identity.foundation/presentation-exchange/spec/v2.0.0/#presentation-definition>
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct PresentationDefinition {
    /// Unique within the relying party's context.
    pub id: String,

    /// Required credentials.
    pub input_descriptors: Vec<InputDescriptor>,

    /// Human-friendly name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Why the proofs are requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

impl PresentationDefinition {
    /// Descriptor ids, in order.
    pub fn descriptor_ids(&self) -> Vec<&str> {
        self.input_descriptors.iter().map(|d| d.id.as_str()).collect()
    }
}

/// One required credential.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct InputDescriptor {
    /// Unique among the definition's descriptors.
    pub id: String,

    /// Human-friendly name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Why this credential is requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,

    /// Accepted claim formats and algorithms, keyed by format designation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<serde_json::Map<String, serde_json::Value>>,

    /// What the credential must contain.
    pub constraints: Constraints,
}

/// Field constraints on a credential.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Constraints {
    /// Each field must be matched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

/// A `JSONPath` selection plus an optional filter on the selected value.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Field {
    /// Alternative `JSONPath` expressions; the first that resolves is used.
    pub path: Vec<String>,

    /// Constraint on the selected value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,

    /// Why this field is constrained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

/// A JSON Schema fragment applied to a selected value.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Filter {
    /// JSON Schema type of the value.
    #[serde(rename = "type")]
    pub type_: String,

    /// The schema keyword.
    #[serde(flatten)]
    pub value: FilterValue,
}

impl Filter {
    /// A string that must equal `value`.
    pub fn const_string(value: impl Into<String>) -> Self {
        Self {
            type_: "string".into(),
            value: FilterValue::Const(value.into()),
        }
    }

    /// An array that must contain the string `value`.
    pub fn array_containing(value: impl Into<String>) -> Self {
        Self {
            type_: "array".into(),
            value: FilterValue::Contains(Box::new(Self::const_string(value))),
        }
    }
}

/// The schema keyword of a [`Filter`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FilterValue {
    /// The value equals a constant.
    Const(String),
    /// The value matches a regular expression.
    Pattern(String),
    /// An array with at least one element matching the nested filter.
    Contains(Box<Filter>),
}

/// How a presentation satisfies a definition.
///
/// <https://identity.foundation/presentation-exchange/spec/v2.0.0/#presentation-submission>
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct PresentationSubmission {
    /// Unique identifier, a UUID.
    pub id: String,

    /// The `id` of the definition this submission fulfills.
    pub definition_id: String,

    /// One entry per input descriptor.
    pub descriptor_map: Vec<DescriptorMap>,
}

impl PresentationSubmission {
    /// Position of the credential mapped to `descriptor_id`.
    pub fn position_of(&self, descriptor_id: &str) -> Option<usize> {
        self.descriptor_map
            .iter()
            .find(|m| m.id == descriptor_id)
            .and_then(DescriptorMap::position)
    }
}

/// Maps one input descriptor to a credential in the presentation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct DescriptorMap {
    /// The input descriptor id.
    pub id: String,

    /// Claim format of the credential.
    pub format: String,

    /// `JSONPath` to the credential, `$.verifiableCredential[n]`.
    pub path: String,
}

impl DescriptorMap {
    const PATH_PREFIX: &'static str = "$.verifiableCredential[";

    /// A JWT credential at position `index`.
    pub fn jwt_vc(id: impl Into<String>, index: usize) -> Self {
        Self {
            id: id.into(),
            format: FORMAT_JWT_VC.to_string(),
            path: format!("{}{index}]", Self::PATH_PREFIX),
        }
    }

    /// The credential position named by `path`, if it has the
    /// `$.verifiableCredential[n]` form.
    pub fn position(&self) -> Option<usize> {
        self.path
            .strip_prefix(Self::PATH_PREFIX)?
            .strip_suffix(']')?
            .parse()
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_serializes_as_json_schema() {
        assert_eq!(
            serde_json::to_value(Filter::const_string("did:key:z6MkIssuer")).unwrap(),
            json!({"type": "string", "const": "did:key:z6MkIssuer"})
        );
        assert_eq!(
            serde_json::to_value(Filter::array_containing("AlumniCredential")).unwrap(),
            json!({"type": "array", "contains": {"type": "string", "const": "AlumniCredential"}})
        );
    }

    #[test]
    fn filter_deserializes_from_json_schema() {
        let filter: Filter =
            serde_json::from_value(json!({"type": "string", "pattern": "^did:key:"})).unwrap();
        assert_eq!(filter.value, FilterValue::Pattern("^did:key:".into()));
    }

    #[test]
    fn descriptor_map_position_roundtrip() {
        let entry = DescriptorMap::jwt_vc("id-2", 1);
        assert_eq!(entry.path, "$.verifiableCredential[1]");
        assert_eq!(entry.format, "jwt_vc");
        assert_eq!(entry.position(), Some(1));
    }

    #[test]
    fn foreign_paths_have_no_position() {
        for path in ["$", "$.vp.verifiableCredential[0]", "$.verifiableCredential[x]"] {
            let entry = DescriptorMap {
                id: "d".into(),
                format: FORMAT_JWT_VC.into(),
                path: path.into(),
            };
            assert_eq!(entry.position(), None, "{path}");
        }
    }

    #[test]
    fn submission_finds_position_by_descriptor() {
        let submission = PresentationSubmission {
            id: "s".into(),
            definition_id: "test-id".into(),
            descriptor_map: vec![DescriptorMap::jwt_vc("id-1", 0), DescriptorMap::jwt_vc("id-2", 1)],
        };
        assert_eq!(submission.position_of("id-2"), Some(1));
        assert_eq!(submission.position_of("id-3"), None);
    }
}
