//! Core state machine types.
//!
//! This module contains the pure part of the wizard's state machine:
//! - The `State` trait and the wizard's `WizardPosition`
//! - Immutable history tracking
//!
//! All logic in this module is pure (no side effects).

mod history;
mod state;

pub use history::{StateHistory, StateTransition};
pub use state::{State, WizardPosition};
