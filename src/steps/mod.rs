//! Step configuration and the per-type continue gate.
//!
//! `StepKind` is a closed sum type and the gate matches on it exhaustively,
//! so a new step type does not compile until its continue rule exists.

#[macro_use]
mod macros;

mod config;
mod gate;

pub use config::{
    composite_key, AddressStep, ChoiceOption, ChoiceStep, DateStep, DescriptionStep, FieldOptions,
    FileUploadStep, GroupQuestion, HeightStep, HeightUnit, InputStep, InsuranceStep, IntroStep,
    NumberStep, QuestionKind, QuestionsGroupStep, RankingStep, RatingStep, SignatureConsentStep,
    StepConfig, StepKind, StepType, TimeStep,
};
pub use gate::{
    can_continue, evaluate, violations, GateViolation, ADDRESS_FIELDS, INSURANCE_FIELDS,
    TIME_FIELDS,
};
