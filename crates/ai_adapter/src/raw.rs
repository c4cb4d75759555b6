//! Raw (untrusted) response shapes returned by the language model
//!
//! Every field is optional: the model may omit, misname, or mistype
//! anything. Consumers validate and coerce these into typed commands and
//! apply engine-defined defaults for whatever is missing.

use serde::{Deserialize, Serialize};

/// The structured command a language model produces for one user input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCommand {
    pub action: Option<String>,
    pub target: Option<RawTarget>,
    pub parameters: Option<RawParameters>,
}

/// A target reference as the model writes it: either a bare keyword
/// ("this", "first", "all") or a typed form like
/// `{"type": "content", "value": "budget"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTarget {
    Keyword(String),
    Typed {
        #[serde(rename = "type")]
        kind: String,
        value: serde_json::Value,
    },
}

/// Command parameters as the model writes them. `count` tolerates both
/// numeric and string forms; `destination` is the anchor for move.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawParameters {
    #[serde(default)]
    pub new_type: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub count: Option<serde_json::Value>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub destination: Option<RawTarget>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_target_deserializes_from_bare_string() {
        let raw: RawTarget = serde_json::from_str("\"first\"").unwrap();
        assert_eq!(raw, RawTarget::Keyword("first".to_string()));
    }

    #[test]
    fn test_typed_target_deserializes_from_object() {
        let raw: RawTarget =
            serde_json::from_str(r#"{"type": "position", "value": 2}"#).unwrap();
        match raw {
            RawTarget::Typed { kind, value } => {
                assert_eq!(kind, "position");
                assert_eq!(value, serde_json::json!(2));
            }
            other => panic!("expected typed target, got {:?}", other),
        }
    }

    #[test]
    fn test_command_tolerates_missing_fields() {
        let raw: RawCommand = serde_json::from_str(r#"{"action": "delete"}"#).unwrap();
        assert_eq!(raw.action.as_deref(), Some("delete"));
        assert!(raw.target.is_none());
        assert!(raw.parameters.is_none());
    }
}
