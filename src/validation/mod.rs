//! Rule-based field validation.
//!
//! Rules are pure and stateless. A rule list is evaluated without
//! short-circuiting: every failing rule contributes its message, and the
//! first message is the one shown to the user. Failures are plain values,
//! never errors, so they never block a value from being stored.

mod engine;
mod presence;
mod rules;

pub use engine::{validate, ValidationResult};
pub use presence::{has_value, is_falsy};
pub use rules::{CustomPredicate, RuleKind, ValidationRule};
