//! Wizard construction and runtime errors.

use crate::steps::StepType;
use crate::store::StoreError;
use thiserror::Error;

/// Error type returned by a host's completion callback.
pub type CompletionError = Box<dyn std::error::Error + Send + Sync>;

/// Configuration errors detected when building a wizard.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("No steps defined. Add at least one step")]
    NoSteps,

    #[error("Step at index {index} has an empty id")]
    EmptyStepId { index: usize },

    #[error("Duplicate step id '{0}'")]
    DuplicateStepId(String),

    #[error("Form key '{key}' of step '{step_id}' collides with another step's key")]
    KeyCollision { step_id: String, key: String },

    #[error("Step '{step_id}' has type '{step_type}' but no implementation is registered for it")]
    UnregisteredStepType { step_id: String, step_type: StepType },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors returned by wizard operations.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Wizard has already completed")]
    AlreadyCompleted,

    /// The host's completion callback failed; passed through unchanged.
    #[error("Completion callback failed: {0}")]
    Completion(#[source] CompletionError),
}

/// A wizard definition could not be parsed.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Invalid wizard definition: {0}")]
    Parse(#[from] serde_json::Error),
}
