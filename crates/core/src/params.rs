//! Helpers for reading effect parameters out of a JSON object.
//!
//! Missing keys and mistyped values fall back to the supplied default, so a
//! partial params object (or `{}`) always produces a usable configuration.

use serde_json::Value;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
///
/// JSON integers are accepted and converted.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts an optional `f64`: `None` when missing, `null`, or not a number.
pub fn param_opt_f64(params: &Value, name: &str) -> Option<f64> {
    params.get(name).and_then(Value::as_f64)
}

/// Extracts a `bool` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

/// Extracts a `String` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn param_f64_extracts_existing_float() {
        let params = json!({"damping": 0.95});
        assert!((param_f64(&params, "damping", 0.99) - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_accepts_integer() {
        let params = json!({"density": 20000});
        assert!((param_f64(&params, "density", 15000.0) - 20000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_falls_back_when_missing_or_mistyped() {
        let params = json!({"damping": "heavy"});
        assert_eq!(param_f64(&params, "damping", 0.99), 0.99);
        assert_eq!(param_f64(&params, "absent", 1.5), 1.5);
    }

    #[test]
    fn param_f64_falls_back_for_non_object() {
        assert_eq!(param_f64(&json!([1, 2, 3]), "damping", 0.99), 0.99);
    }

    #[test]
    fn param_opt_f64_none_for_null_and_missing() {
        assert_eq!(param_opt_f64(&json!({"max_speed": null}), "max_speed"), None);
        assert_eq!(param_opt_f64(&json!({}), "max_speed"), None);
        assert_eq!(
            param_opt_f64(&json!({"max_speed": 3}), "max_speed"),
            Some(3.0)
        );
    }

    #[test]
    fn param_bool_extracts_and_falls_back() {
        assert!(!param_bool(&json!({"enabled": false}), "enabled", true));
        assert!(param_bool(&json!({"enabled": 0}), "enabled", true));
    }

    #[test]
    fn param_string_extracts_and_falls_back() {
        let params = json!({"connection_mode": "grid"});
        assert_eq!(param_string(&params, "connection_mode", "pairwise"), "grid");
        assert_eq!(
            param_string(&json!({"connection_mode": 1}), "connection_mode", "pairwise"),
            "pairwise"
        );
    }
}
