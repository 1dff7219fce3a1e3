//! Presence predicates shared by the rule engine and the step gate.

use serde_json::Value;

/// Whether a stored value counts as "filled in".
///
/// `None` and `null` are absent. Strings must be non-blank after trimming,
/// arrays non-empty, numbers `>= 0`, objects must have at least one key.
/// Only `true` counts for booleans, so an unticked checkbox is absent while
/// a zero is present.
///
/// ```rust
/// use serde_json::json;
/// use waypoint::validation::has_value;
///
/// assert!(has_value(Some(&json!(0))));
/// assert!(!has_value(Some(&json!(false))));
/// assert!(!has_value(Some(&json!("   "))));
/// assert!(!has_value(None));
/// ```
pub fn has_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n >= 0.0),
        Some(Value::Bool(b)) => *b,
        Some(Value::Object(map)) => !map.is_empty(),
    }
}

/// Loose "falsy" test used by the format rules to skip empty input.
///
/// Falsy values are `null`, `false`, `0` and `""`. Arrays and objects are
/// never falsy, even when empty.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
