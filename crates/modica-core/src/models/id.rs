//! Model instance identifiers.

use serde::{Deserialize, Serialize};

/// Identifier of a model instance.
///
/// Backends hand these out either as JSON integers or as strings (slugs,
/// uuids); URLs always carry the string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelId {
    Int(i64),
    Str(String),
}

impl ModelId {
    /// Lift an identifier out of a JSON field, if the field holds one.
    pub fn from_value(value: &serde_json::Value) -> Option<ModelId> {
        match value {
            serde_json::Value::Number(n) => n.as_i64().map(ModelId::Int),
            serde_json::Value::String(s) => Some(ModelId::Str(s.clone())),
            _ => None,
        }
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelId::Int(n) => write!(f, "{n}"),
            ModelId::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ModelId {
    fn from(n: i64) -> Self {
        ModelId::Int(n)
    }
}

impl From<&str> for ModelId {
    fn from(s: &str) -> Self {
        ModelId::Str(s.to_string())
    }
}

impl From<String> for ModelId {
    fn from(s: String) -> Self {
        ModelId::Str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_id_coerces_to_string_form() {
        assert_eq!(ModelId::Int(42).to_string(), "42");
        assert_eq!(ModelId::from("a1b2").to_string(), "a1b2");
    }

    #[test]
    fn test_from_value_accepts_numbers_and_strings() {
        assert_eq!(ModelId::from_value(&json!(7)), Some(ModelId::Int(7)));
        assert_eq!(
            ModelId::from_value(&json!("seven")),
            Some(ModelId::Str("seven".to_string()))
        );
        assert_eq!(ModelId::from_value(&json!(null)), None);
        assert_eq!(ModelId::from_value(&json!({"id": 1})), None);
    }

    #[test]
    fn test_untagged_serde_round_trip() {
        let int: ModelId = serde_json::from_str("7").unwrap();
        assert_eq!(int, ModelId::Int(7));
        assert_eq!(serde_json::to_string(&int).unwrap(), "7");

        let s: ModelId = serde_json::from_str("\"x\"").unwrap();
        assert_eq!(s, ModelId::Str("x".to_string()));
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"x\"");
    }
}
