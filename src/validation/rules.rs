//! Declarative field validation rules.

use super::presence::is_falsy;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Host-supplied predicate for `custom` rules.
#[derive(Clone)]
pub struct CustomPredicate(Arc<dyn Fn(&Value) -> bool + Send + Sync>);

impl CustomPredicate {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    pub fn check(&self, value: &Value) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for CustomPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomPredicate(..)")
    }
}

/// What a rule checks. Serialized as `{"type": "minLength", "value": 3}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RuleKind {
    /// Fails only on `null` and `""`.
    Required,
    Email,
    MinLength {
        value: usize,
    },
    MaxLength {
        value: usize,
    },
    Pattern {
        value: String,
    },
    /// Passes when no predicate is attached.
    Custom {
        #[serde(skip)]
        predicate: Option<CustomPredicate>,
    },
}

impl RuleKind {
    /// Pure check of a single value against this rule.
    ///
    /// Format rules (`email`, lengths, `pattern`) accept falsy input and leave
    /// presence to `required`.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Required => !matches!(value, Value::Null) && value.as_str() != Some(""),
            Self::Email => is_falsy(value) || EMAIL.is_match(&as_text(value)),
            Self::MinLength { value: min } => {
                is_falsy(value) || length_of(value).map_or(true, |len| len >= *min)
            }
            Self::MaxLength { value: max } => {
                is_falsy(value) || length_of(value).map_or(true, |len| len <= *max)
            }
            Self::Pattern { value: pattern } => {
                if is_falsy(value) {
                    return true;
                }
                match Regex::new(pattern) {
                    Ok(re) => re.is_match(&as_text(value)),
                    Err(err) => {
                        warn!(pattern = %pattern, error = %err, "invalid pattern rule, treating as failed");
                        false
                    }
                }
            }
            Self::Custom { predicate } => predicate.as_ref().map_or(true, |p| p.check(value)),
        }
    }
}

/// A rule plus the message shown when it fails.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use waypoint::validation::ValidationRule;
///
/// let rule = ValidationRule::min_length(3, "Too short");
/// assert!(!rule.accepts(&json!("ab")));
/// assert!(rule.accepts(&json!("")));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(flatten)]
    pub kind: RuleKind,
    pub message: String,
}

impl ValidationRule {
    pub fn new(kind: RuleKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn required(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Required, message)
    }

    pub fn email(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Email, message)
    }

    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        Self::new(RuleKind::MinLength { value: min }, message)
    }

    pub fn max_length(max: usize, message: impl Into<String>) -> Self {
        Self::new(RuleKind::MaxLength { value: max }, message)
    }

    pub fn pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            RuleKind::Pattern {
                value: pattern.into(),
            },
            message,
        )
    }

    pub fn custom<F>(predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::new(
            RuleKind::Custom {
                predicate: Some(CustomPredicate::new(predicate)),
            },
            message,
        )
    }

    pub fn is_required(&self) -> bool {
        matches!(self.kind, RuleKind::Required)
    }

    pub fn accepts(&self, value: &Value) -> bool {
        self.kind.accepts(value)
    }
}

// Strings are matched as-is, anything else by its JSON text.
fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}
