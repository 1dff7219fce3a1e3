//! Waypoint: a multi-step form wizard engine
//!
//! A wizard is an ordered list of typed steps sharing one key/value form
//! store. The user moves forward one step at a time, and only when the
//! current step's answers satisfy its continue gate. Continuing from the last
//! step hands the full form data to a completion callback.
//!
//! # Core Concepts
//!
//! - **Validation**: Declarative field rules evaluated without short-circuit
//! - **Form store**: Shared answers with a debounced change notification
//! - **Field binding**: One input's value, touched flag and error message
//! - **Continue gate**: Per-step-type rules deciding whether "Next" is enabled
//! - **Resolver**: Lazy, memoized step implementations with placeholder fallback
//! - **Wizard**: The controller tying the above together
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use waypoint::steps::StepConfig;
//! use waypoint::wizard::{Advance, Wizard};
//!
//! let mut wizard = Wizard::builder()
//!     .step(StepConfig::intro("welcome", "Welcome"))
//!     .step(StepConfig::text("name", "Your name"))
//!     .on_complete(|data| {
//!         assert_eq!(data.get("name"), Some(&json!("Ada")));
//!         Ok(())
//!     })
//!     .build()
//!     .unwrap();
//!
//! wizard.set_intro_checked(true);
//! assert_eq!(wizard.request_next().unwrap(), Advance::Moved { from: 0, to: 1 });
//!
//! wizard.store().write("name", json!("Ada"));
//! assert_eq!(wizard.request_next().unwrap(), Advance::Completed);
//! ```

pub mod binding;
pub mod core;
pub mod resolver;
pub mod steps;
pub mod store;
pub mod validation;
pub mod wizard;

// Re-export commonly used types
pub use binding::{FieldBinding, FieldSpec};
pub use core::{State, StateHistory, StateTransition, WizardPosition};
pub use steps::{StepConfig, StepKind, StepType};
pub use store::{FormData, FormStore};
pub use validation::{validate, ValidationResult, ValidationRule};
pub use wizard::{Advance, Wizard, WizardBuilder, WizardError};
