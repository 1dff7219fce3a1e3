//! Wizard construction and the step controller.

mod builder;
mod config;
mod controller;
mod error;

pub use builder::WizardBuilder;
pub use config::{WizardConfig, WizardDefinition};
pub use controller::{Advance, CompletionHook, Rendered, Wizard, WizardState};
pub use error::{BuildError, CompletionError, DefinitionError, WizardError};
