//! Continue gate: whether a step's answers allow moving on.
//!
//! The gate is a pure function of the step config, a form data snapshot and
//! the wizard's intro consent flag. Every unmet requirement is reported,
//! not just the first one.

use super::config::{composite_key, SignatureConsentStep, StepConfig, StepKind};
use crate::store::FormData;
use crate::validation::has_value;
use serde::Serialize;
use serde_json::Value;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

pub const TIME_FIELDS: &[&str] = &["hour", "minute", "amPm"];
pub const ADDRESS_FIELDS: &[&str] = &["addressLine1", "city", "state", "zipCode"];
pub const INSURANCE_FIELDS: &[&str] = &[
    "insurer",
    "memberId",
    "planName",
    "planStartDate",
    "relationshipToPolicyOwner",
];

/// Why a step's continue action is disabled
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum GateViolation {
    #[error("Intro consent has not been accepted")]
    IntroNotAccepted,

    #[error("No value for '{key}'")]
    Missing { key: String },

    #[error("No value for '{field}' in '{key}'")]
    MissingField { key: String, field: String },

    #[error("Consent '{key}' has not been given")]
    ConsentNotGiven { key: String },

    #[error("'{key}' must be non-blank text")]
    NotText { key: String },

    #[error("'{key}' must contain at least one item")]
    EmptySelection { key: String },

    #[error("'{key}' must be a number of at least 0")]
    NotNonNegative { key: String },

    /// Reported by the wizard once it has completed; no step produces it.
    #[error("Wizard has already completed")]
    WizardCompleted,
}

type GateCheck = Validation<(), NonEmptyVec<GateViolation>>;

/// Evaluate every requirement of `step`, accumulating ALL violations.
pub fn evaluate(step: &StepConfig, data: &FormData, intro_checked: bool) -> GateCheck {
    let id = step.id();
    let checks: Vec<GateCheck> = match step.kind() {
        // ranking has no wrong order
        StepKind::Description(_) | StepKind::Ranking(_) => Vec::new(),

        StepKind::Intro(_) => vec![require(intro_checked, || GateViolation::IntroNotAccepted)],

        StepKind::QuestionsGroup(group) => group
            .questions
            .iter()
            .map(|question| {
                let key = composite_key(id, &question.key);
                require(has_value(data.get(&key)), || GateViolation::Missing { key })
            })
            .collect(),

        StepKind::SignatureConsent(_) => {
            let consent = SignatureConsentStep::consent_key(id);
            let signature = SignatureConsentStep::signature_key(id);
            vec![
                require(data.get(&consent) == Some(&Value::Bool(true)), || {
                    GateViolation::ConsentNotGiven { key: consent }
                }),
                require(has_value(data.get(&signature)), || GateViolation::Missing {
                    key: signature,
                }),
            ]
        }

        StepKind::Time(_) => object_fields(id, data, TIME_FIELDS),
        StepKind::Address(_) => object_fields(id, data, ADDRESS_FIELDS),
        StepKind::Insurance(_) => object_fields(id, data, INSURANCE_FIELDS),

        StepKind::Text(_)
        | StepKind::Email(_)
        | StepKind::Phone(_)
        | StepKind::Number(_)
        | StepKind::LongText(_)
        | StepKind::Select(_)
        | StepKind::Choice(_)
        | StepKind::Date(_) => stored(id, data, is_text, |key| GateViolation::NotText { key }),

        StepKind::MultiSelect(_) | StepKind::Checkbox(_) | StepKind::FileUpload(_) => {
            stored(id, data, is_non_empty_array, |key| {
                GateViolation::EmptySelection { key }
            })
        }

        StepKind::Rating(_) => stored(id, data, is_non_negative_number, |key| {
            GateViolation::NotNonNegative { key }
        }),

        StepKind::DateTime(_) | StepKind::Height(_) => {
            vec![require(has_value(data.get(id)), || GateViolation::Missing {
                key: id.to_string(),
            })]
        }
    };

    Validation::all_vec(checks).map(|_| ())
}

/// Whether the continue action may fire for `step`.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use waypoint::steps::{can_continue, StepConfig};
/// use waypoint::store::FormData;
///
/// let step = StepConfig::rating("score", "How was it?");
/// let data: FormData = [("score", json!(4))].into_iter().collect();
///
/// assert!(can_continue(&step, &data, false));
/// assert!(!can_continue(&step, &FormData::new(), false));
/// ```
pub fn can_continue(step: &StepConfig, data: &FormData, intro_checked: bool) -> bool {
    evaluate(step, data, intro_checked).is_success()
}

/// Every unmet requirement, empty when the gate is open.
pub fn violations(step: &StepConfig, data: &FormData, intro_checked: bool) -> Vec<GateViolation> {
    match evaluate(step, data, intro_checked) {
        Validation::Success(_) => Vec::new(),
        Validation::Failure(errors) => errors.iter().cloned().collect(),
    }
}

fn require<F>(ok: bool, violation: F) -> GateCheck
where
    F: FnOnce() -> GateViolation,
{
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

// Presence first, then the type-class rule.
fn stored<P, V>(id: &str, data: &FormData, accepts: P, violation: V) -> Vec<GateCheck>
where
    P: Fn(&Value) -> bool,
    V: FnOnce(String) -> GateViolation,
{
    let check = match data.get(id) {
        value if !has_value(value) => Validation::fail(GateViolation::Missing { key: id.to_string() }),
        Some(value) if !accepts(value) => Validation::fail(violation(id.to_string())),
        _ => Validation::success(()),
    };
    vec![check]
}

fn object_fields(id: &str, data: &FormData, fields: &[&str]) -> Vec<GateCheck> {
    let object = data.get(id).and_then(Value::as_object);
    fields
        .iter()
        .map(|field| {
            let present = has_value(object.and_then(|o| o.get(*field)));
            require(present, || GateViolation::MissingField {
                key: id.to_string(),
                field: (*field).to_string(),
            })
        })
        .collect()
}

fn is_text(value: &Value) -> bool {
    value.as_str().is_some_and(|s| !s.trim().is_empty())
}

fn is_non_empty_array(value: &Value) -> bool {
    value.as_array().is_some_and(|items| !items.is_empty())
}

fn is_non_negative_number(value: &Value) -> bool {
    value.as_f64().is_some_and(|n| n >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::{ChoiceStep, DateStep, FieldOptions, GroupQuestion, HeightStep, InputStep};
    use serde_json::json;

    fn data(entries: &[(&str, Value)]) -> FormData {
        entries.iter().map(|(k, v)| (*k, v.clone())).collect()
    }

    #[test]
    fn description_and_ranking_always_continue() {
        let description = StepConfig::description("d", "About");
        let ranking = StepConfig::new("r", StepKind::Ranking(Default::default()));

        assert!(can_continue(&description, &FormData::new(), false));
        assert!(can_continue(&ranking, &FormData::new(), false));
    }

    #[test]
    fn intro_follows_consent_flag_only() {
        let intro = StepConfig::intro("intro", "Welcome");
        let filled = data(&[("intro", json!(true))]);

        assert!(!can_continue(&intro, &filled, false));
        assert!(can_continue(&intro, &FormData::new(), true));
        assert_eq!(
            violations(&intro, &FormData::new(), false),
            vec![GateViolation::IntroNotAccepted]
        );
    }

    #[test]
    fn questions_group_needs_every_composite_key() {
        let group = StepConfig::questions_group(
            "grp",
            "About you",
            vec![GroupQuestion::new("q1", "Q1"), GroupQuestion::new("q2", "Q2")],
        );

        assert!(!can_continue(&group, &data(&[("grp_q1", json!("yes"))]), false));
        assert_eq!(
            violations(&group, &FormData::new(), false),
            vec![
                GateViolation::Missing { key: "grp_q1".into() },
                GateViolation::Missing { key: "grp_q2".into() },
            ]
        );
        assert!(can_continue(
            &group,
            &data(&[("grp_q1", json!("yes")), ("grp_q2", json!(0))]),
            false
        ));
    }

    #[test]
    fn empty_questions_group_continues() {
        let group = StepConfig::questions_group("grp", "Nothing", vec![]);
        assert!(can_continue(&group, &FormData::new(), false));
    }

    #[test]
    fn signature_consent_needs_literal_true_and_signature() {
        let step = StepConfig::signature_consent("sig", "Consent", "I agree");

        assert!(!can_continue(&step, &data(&[("sig_consent", json!(true))]), false));
        assert!(!can_continue(
            &step,
            &data(&[("sig_consent", json!("true")), ("sig_signature", json!("Ada L"))]),
            false
        ));
        assert!(can_continue(
            &step,
            &data(&[("sig_consent", json!(true)), ("sig_signature", json!("Ada L"))]),
            false
        ));
    }

    #[test]
    fn time_needs_hour_minute_and_meridiem() {
        let step = StepConfig::time("t", "When?");

        let partial = data(&[("t", json!({"hour": 9, "minute": 0}))]);
        assert_eq!(
            violations(&step, &partial, false),
            vec![GateViolation::MissingField { key: "t".into(), field: "amPm".into() }]
        );

        let full = data(&[("t", json!({"hour": 9, "minute": 0, "amPm": "AM"}))]);
        assert!(can_continue(&step, &full, false));
    }

    #[test]
    fn address_line_two_is_optional() {
        let step = StepConfig::address("addr", "Address");
        let address = json!({
            "addressLine1": "1 Main St",
            "city": "Springfield",
            "state": "IL",
            "zipCode": "62701"
        });

        assert!(can_continue(&step, &data(&[("addr", address)]), false));

        let blank_city = json!({
            "addressLine1": "1 Main St",
            "addressLine2": "Apt 2",
            "city": "  ",
            "state": "IL",
            "zipCode": "62701"
        });
        assert!(!can_continue(&step, &data(&[("addr", blank_city)]), false));
        assert!(!can_continue(&step, &data(&[("addr", json!("1 Main St"))]), false));
    }

    #[test]
    fn insurance_needs_all_policy_fields() {
        let step = StepConfig::new("ins", StepKind::Insurance(Default::default()));
        let mut policy = json!({
            "insurer": "Acme",
            "memberId": "X1",
            "planName": "Gold",
            "planStartDate": "2024-01-01",
            "relationshipToPolicyOwner": "self"
        });
        assert!(can_continue(&step, &data(&[("ins", policy.clone())]), false));

        policy["memberId"] = json!("");
        assert!(!can_continue(&step, &data(&[("ins", policy)]), false));
    }

    #[test]
    fn string_steps_need_non_blank_text() {
        let step = StepConfig::text("name", "Name");

        assert!(!can_continue(&step, &FormData::new(), false));
        assert!(!can_continue(&step, &data(&[("name", json!("   "))]), false));
        assert!(can_continue(&step, &data(&[("name", json!("Ada"))]), false));
        assert_eq!(
            violations(&step, &data(&[("name", json!(5))]), false),
            vec![GateViolation::NotText { key: "name".into() }]
        );

        let select = StepConfig::new("plan", StepKind::Select(ChoiceStep::default()));
        assert!(can_continue(&select, &data(&[("plan", json!("gold"))]), false));

        let date = StepConfig::new("dob", StepKind::Date(DateStep::default()));
        assert!(can_continue(&date, &data(&[("dob", json!("1815-12-10"))]), false));
    }

    #[test]
    fn array_steps_need_items() {
        let step = StepConfig::new("tags", StepKind::MultiSelect(ChoiceStep::default()));

        assert!(!can_continue(&step, &data(&[("tags", json!([]))]), false));
        assert!(!can_continue(&step, &data(&[("tags", json!("a"))]), false));
        assert!(can_continue(&step, &data(&[("tags", json!(["a"]))]), false));
    }

    #[test]
    fn rating_needs_non_negative_number() {
        let step = StepConfig::rating("score", "Score");

        assert!(can_continue(&step, &data(&[("score", json!(4))]), false));
        assert!(can_continue(&step, &data(&[("score", json!(0))]), false));
        assert!(!can_continue(&step, &data(&[("score", json!(-1))]), false));
        assert!(!can_continue(&step, &data(&[("score", json!("4"))]), false));
    }

    #[test]
    fn other_value_steps_only_need_presence() {
        let height = StepConfig::new(
            "h",
            StepKind::Height(HeightStep {
                field: FieldOptions::labeled("Height"),
                ..Default::default()
            }),
        );
        assert!(can_continue(&height, &data(&[("h", json!({"feet": 5, "inches": 9}))]), false));
        assert!(!can_continue(&height, &data(&[("h", json!({}))]), false));

        let when = StepConfig::new("at", StepKind::DateTime(DateStep::default()));
        assert!(can_continue(&when, &data(&[("at", json!("2024-05-01T10:00"))]), false));
    }

    #[test]
    fn violations_display_readably() {
        let violation = GateViolation::MissingField {
            key: "addr".into(),
            field: "city".into(),
        };
        assert_eq!(violation.to_string(), "No value for 'city' in 'addr'");
    }

    #[test]
    fn phone_uses_string_rule() {
        let step = StepConfig::new("phone", StepKind::Phone(InputStep::labeled("Phone")));
        assert!(can_continue(&step, &data(&[("phone", json!("555-0100"))]), false));
    }
}
