//! Core State trait and the wizard's position state.
//!
//! All state machine states implement this trait, which provides
//! pure methods for inspecting state properties without side effects.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// All methods are pure - no side effects. States represent immutable
/// values that describe the current position in a state machine.
///
/// # Required Traits
///
/// - `Clone`: States must be cloneable for history tracking
/// - `PartialEq`: States must be comparable for transition logic
/// - `Debug`: States must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: States must be serializable for reporting
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}

/// Where a wizard currently is.
///
/// A wizard walks `Step(0) .. Step(n - 1)` forward one index at a time and
/// reaches `Completed` only from the last step.
///
/// # Example
///
/// ```rust
/// use waypoint::core::{State, WizardPosition};
///
/// let position = WizardPosition::Step(0);
/// assert_eq!(position.name(), "Step");
/// assert!(!position.is_final());
/// assert!(WizardPosition::Completed.is_final());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "state", content = "index", rename_all = "camelCase")]
pub enum WizardPosition {
    /// Showing the step at this index.
    Step(usize),
    /// The completion callback has fired.
    Completed,
}

impl WizardPosition {
    /// Step index, or `None` once completed.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Step(index) => Some(*index),
            Self::Completed => None,
        }
    }
}

impl State for WizardPosition {
    fn name(&self) -> &str {
        match self {
            Self::Step(_) => "Step",
            Self::Completed => "Completed",
        }
    }

    fn is_final(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_name_returns_correct_value() {
        assert_eq!(WizardPosition::Step(3).name(), "Step");
        assert_eq!(WizardPosition::Completed.name(), "Completed");
    }

    #[test]
    fn only_completed_is_final() {
        assert!(!WizardPosition::Step(0).is_final());
        assert!(!WizardPosition::Step(9).is_final());
        assert!(WizardPosition::Completed.is_final());
    }

    #[test]
    fn index_is_exposed_for_steps_only() {
        assert_eq!(WizardPosition::Step(2).index(), Some(2));
        assert_eq!(WizardPosition::Completed.index(), None);
    }

    #[test]
    fn position_serializes_correctly() {
        let json = serde_json::to_string(&WizardPosition::Step(1)).unwrap();
        assert_eq!(json, r#"{"state":"step","index":1}"#);

        let deserialized: WizardPosition = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, WizardPosition::Step(1));

        let completed = serde_json::to_string(&WizardPosition::Completed).unwrap();
        let back: WizardPosition = serde_json::from_str(&completed).unwrap();
        assert_eq!(back, WizardPosition::Completed);
    }
}
