use serde_json::{Map, Number, Value};

use crate::error::ApiError;

/// Ordered key/value pairs forwarded to the platform, query- or form-encoded
pub type Params = Vec<(&'static str, String)>;

/// Loosely-typed fields of an inbound capability request
///
/// Bodies arrive either as JSON or as urlencoded forms, so every field is kept
/// as a JSON value and coerced to text only when forwarded.
#[derive(Debug, Clone, Default)]
pub struct RequestFields(Map<String, Value>);

impl RequestFields {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Build from urlencoded form pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        )
    }

    /// Textual value of a field, or `None` when it is absent or blank
    ///
    /// Missing, `null`, `""`, `false` and numeric zero all count as absent.
    pub fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(coerce)
    }

    /// Value of a mandatory field
    pub fn require(&self, key: &str) -> Result<String, ApiError> {
        self.get(key).ok_or_else(|| {
            ApiError::ValidationError(format!("Missing required parameter: {}", key))
        })
    }

    /// Value of an optional field, falling back to a literal default
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}

/// Convert a JSON value into the text sent upstream
fn coerce(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(number_text(n)),
        // Structured values are forwarded as their JSON text
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

/// Decimal text of a number, integral floats without their fraction
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            (f as i64).to_string()
        }
        _ => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn fields(value: Value) -> RequestFields {
        match value {
            Value::Object(map) => RequestFields::new(map),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_falsy_values_are_absent() {
        let f = fields(json!({
            "a": null,
            "b": "",
            "c": false,
            "d": 0,
            "e": 0.0,
        }));

        for key in ["a", "b", "c", "d", "e", "missing"] {
            assert_eq!(f.get(key), None, "field {key} should be absent");
        }
    }

    #[test]
    fn test_scalars_are_stringified() {
        let f = fields(json!({"spd": 7, "flag": true, "ratio": 1.5, "s": "0"}));
        assert_eq!(f.get("spd").as_deref(), Some("7"));
        assert_eq!(f.get("flag").as_deref(), Some("true"));
        assert_eq!(f.get("ratio").as_deref(), Some("1.5"));
        // A string "0" is a real value
        assert_eq!(f.get("s").as_deref(), Some("0"));
    }

    #[test]
    fn test_integral_floats_drop_fraction() {
        let f = fields(json!({"spd": 5.0, "big": 1e2, "neg": -3.0, "half": -2.5}));
        assert_eq!(f.get("spd").as_deref(), Some("5"));
        assert_eq!(f.get("big").as_deref(), Some("100"));
        assert_eq!(f.get("neg").as_deref(), Some("-3"));
        assert_eq!(f.get("half").as_deref(), Some("-2.5"));
    }

    #[test]
    fn test_require_reports_field_name() {
        let f = RequestFields::default();
        let err = f.require("image").unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
        assert_eq!(
            err.to_string(),
            "Validation error: Missing required parameter: image"
        );
    }

    #[test]
    fn test_get_or_default() {
        let f = RequestFields::from_pairs([("lan", "en"), ("spd", "")]);
        assert_eq!(f.get_or("lan", "zh"), "en");
        assert_eq!(f.get_or("spd", "5"), "5");
        assert_eq!(f.get_or("pit", "5"), "5");
    }

    proptest! {
        #[test]
        fn prop_non_empty_strings_pass_through(s in ".+") {
            let f = RequestFields::from_pairs([("field", s.clone())]);
            prop_assert_eq!(f.get("field"), Some(s));
        }

        #[test]
        fn prop_nonzero_integers_are_decimal_text(n in any::<i64>().prop_filter("nonzero", |n| *n != 0)) {
            let f = fields(json!({ "n": n }));
            prop_assert_eq!(f.get("n"), Some(n.to_string()));
        }

        #[test]
        fn prop_integral_floats_match_integer_text(
            n in (-1_000_000_000_000i64..1_000_000_000_000i64).prop_filter("nonzero", |n| *n != 0)
        ) {
            let f = fields(json!({ "n": n as f64 }));
            prop_assert_eq!(f.get("n"), Some(n.to_string()));
        }
    }
}
