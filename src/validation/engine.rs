//! Evaluates a value against an ordered rule list.

use super::rules::ValidationRule;
use serde::Serialize;
use serde_json::Value;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Outcome of running every rule against one value.
///
/// `is_valid` is always `errors.is_empty()`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    is_valid: bool,
    errors: Vec<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self::from_errors(Vec::new())
    }

    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Every failing message, in rule declaration order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// The message surfaced to the user.
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

/// Run all rules against `value` and collect every failure.
///
/// No rule short-circuits the others. Absent values are passed as `null`.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use waypoint::validation::{validate, ValidationRule};
///
/// let rules = vec![
///     ValidationRule::min_length(5, "At least 5 characters"),
///     ValidationRule::pattern("^[0-9]+$", "Digits only"),
/// ];
/// let result = validate(&json!("ab"), &rules);
///
/// assert!(!result.is_valid());
/// assert_eq!(result.errors().len(), 2);
/// assert_eq!(result.first_error(), Some("At least 5 characters"));
/// ```
pub fn validate(value: &Value, rules: &[ValidationRule]) -> ValidationResult {
    let checks: Vec<Validation<(), NonEmptyVec<String>>> = rules
        .iter()
        .map(|rule| {
            if rule.accepts(value) {
                Validation::success(())
            } else {
                Validation::fail(rule.message.clone())
            }
        })
        .collect();

    match Validation::all_vec(checks) {
        Validation::Success(_) => ValidationResult::valid(),
        Validation::Failure(errors) => ValidationResult::from_errors(errors.iter().cloned().collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_rule_list_is_valid() {
        let result = validate(&Value::Null, &[]);
        assert!(result.is_valid());
        assert!(result.errors().is_empty());
        assert_eq!(result.first_error(), None);
    }

    #[test]
    fn collects_all_failures_in_declaration_order() {
        let rules = vec![
            ValidationRule::required("Required"),
            ValidationRule::min_length(10, "Too short"),
            ValidationRule::email("Not an email"),
            ValidationRule::max_length(2, "Too long"),
        ];

        let result = validate(&json!("hello"), &rules);

        assert!(!result.is_valid());
        assert_eq!(
            result.errors(),
            &["Too short".to_string(), "Not an email".to_string(), "Too long".to_string()]
        );
        assert_eq!(result.first_error(), Some("Too short"));
    }

    #[test]
    fn required_failure_does_not_hide_other_rules() {
        let rules = vec![
            ValidationRule::required("Required"),
            ValidationRule::custom(|_| false, "Never"),
        ];

        let result = validate(&json!(""), &rules);
        assert_eq!(result.errors(), &["Required".to_string(), "Never".to_string()]);
    }

    #[test]
    fn passing_value_is_valid() {
        let rules = vec![
            ValidationRule::required("Required"),
            ValidationRule::email("Not an email"),
        ];
        let result = validate(&json!("ada@example.com"), &rules);
        assert!(result.is_valid());
    }

    #[test]
    fn result_serializes_camel_case() {
        let json = serde_json::to_value(ValidationResult::from_errors(vec!["x".into()])).unwrap();
        assert_eq!(json, json!({"isValid": false, "errors": ["x"]}));
    }
}
