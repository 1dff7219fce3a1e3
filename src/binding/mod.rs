//! Per-field adapter between a rendered input and the form store.
//!
//! A binding writes every change straight to the store and keeps only
//! disposable UI state (`touched`, displayed error). Building a new binding
//! for a step, or calling [`FieldBinding::rebind`], resets that UI state
//! while the stored value survives, so a revisited step shows its answer
//! without stale errors.

use crate::steps::{composite_key, GroupQuestion, StepConfig};
use crate::store::FormStore;
use crate::validation::{validate, ValidationResult, ValidationRule};
use serde_json::Value;
use tracing::trace;

/// Message of the rule added for `required` fields without an explicit one.
pub const REQUIRED_MESSAGE: &str = "This field is required";

/// What a binding is bound to.
#[derive(Clone, Debug)]
pub struct FieldSpec {
    pub step_id: String,
    pub rules: Vec<ValidationRule>,
    pub default_value: Value,
    pub required: bool,
}

impl FieldSpec {
    pub fn new(step_id: impl Into<String>) -> Self {
        Self {
            step_id: step_id.into(),
            rules: Vec::new(),
            default_value: Value::Null,
            required: false,
        }
    }

    /// Binding settings for a single-value step. Steps without one get no rules.
    pub fn from_step(step: &StepConfig) -> Self {
        let spec = Self::new(step.id());
        match step.field() {
            Some(field) => Self {
                rules: field.validation.clone(),
                default_value: field.default_value.clone().unwrap_or(Value::Null),
                required: field.required,
                ..spec
            },
            None => spec,
        }
    }

    /// Binding settings for one question of a questions group.
    pub fn for_question(step_id: &str, question: &GroupQuestion) -> Self {
        Self::new(composite_key(step_id, &question.key)).required(true)
    }

    pub fn rules(mut self, rules: Vec<ValidationRule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = value;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    fn effective_rules(&self) -> Vec<ValidationRule> {
        let mut rules = self.rules.clone();
        if self.required && !rules.iter().any(ValidationRule::is_required) {
            rules.insert(0, ValidationRule::required(REQUIRED_MESSAGE));
        }
        rules
    }
}

/// One input bound to one store key.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use waypoint::binding::{FieldBinding, FieldSpec};
/// use waypoint::store::FormStore;
/// use waypoint::validation::ValidationRule;
///
/// let store = FormStore::new();
/// let spec = FieldSpec::new("email").rules(vec![ValidationRule::email("Invalid email")]);
/// let mut field = FieldBinding::new(spec, store.clone());
///
/// field.on_change(json!("ada@"));
/// assert_eq!(field.error(), None); // not touched yet
///
/// field.on_blur();
/// assert_eq!(field.error(), Some("Invalid email"));
/// assert_eq!(store.read("email"), Some(json!("ada@")));
/// ```
#[derive(Debug)]
pub struct FieldBinding {
    spec: FieldSpec,
    rules: Vec<ValidationRule>,
    store: FormStore,
    value: Value,
    touched: bool,
    error: Option<String>,
}

impl FieldBinding {
    /// Mount a binding: load the stored value, or the default when absent.
    pub fn new(spec: FieldSpec, store: FormStore) -> Self {
        let rules = spec.effective_rules();
        let value = store
            .read(&spec.step_id)
            .unwrap_or_else(|| spec.default_value.clone());
        Self {
            spec,
            rules,
            store,
            value,
            touched: false,
            error: None,
        }
    }

    pub fn for_step(step: &StepConfig, store: FormStore) -> Self {
        Self::new(FieldSpec::from_step(step), store)
    }

    /// Point the binding at another step id, as on navigation.
    ///
    /// Reloads the value and clears `touched` and the displayed error.
    pub fn rebind(&mut self, step_id: impl Into<String>) {
        self.spec.step_id = step_id.into();
        self.value = self
            .store
            .read(&self.spec.step_id)
            .unwrap_or_else(|| self.spec.default_value.clone());
        self.touched = false;
        self.error = None;
    }

    pub fn step_id(&self) -> &str {
        &self.spec.step_id
    }

    /// The last value rendered by this binding.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn touched(&self) -> bool {
        self.touched
    }

    /// Error currently displayed, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Store the value; revalidate only once the field has been touched.
    ///
    /// The write happens even when the value is invalid.
    pub fn on_change(&mut self, value: Value) {
        self.store.write(self.spec.step_id.clone(), value.clone());
        self.value = value;
        if self.touched {
            self.refresh_error();
        }
    }

    /// Mark touched and validate unconditionally.
    pub fn on_blur(&mut self) {
        self.touched = true;
        self.refresh_error();
    }

    /// Full result for the current value, without changing displayed state.
    pub fn validate(&self) -> ValidationResult {
        validate(&self.value, &self.rules)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_valid()
    }

    fn refresh_error(&mut self) {
        let result = self.validate();
        self.error = result.first_error().map(str::to_string);
        trace!(key = %self.spec.step_id, valid = result.is_valid(), "field validated");
    }
}
