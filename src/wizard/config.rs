//! Wizard settings and JSON wizard definitions.

use super::error::DefinitionError;
use crate::steps::StepConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Tunables for a wizard instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WizardConfig {
    /// Quiet period before the change callback fires, in milliseconds.
    pub debounce_ms: u64,
}

impl WizardConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

/// A complete wizard described as data.
///
/// # Example
///
/// ```rust
/// use waypoint::wizard::WizardDefinition;
///
/// let definition = WizardDefinition::from_json(r#"{
///     "config": { "debounceMs": 150 },
///     "steps": [
///         { "id": "welcome", "type": "intro", "title": "Welcome" },
///         { "id": "name", "type": "text", "label": "Your name" }
///     ]
/// }"#).unwrap();
///
/// assert_eq!(definition.config.debounce_ms, 150);
/// assert_eq!(definition.steps.len(), 2);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WizardDefinition {
    #[serde(default)]
    pub config: WizardConfig,
    pub steps: Vec<StepConfig>,
}

impl WizardDefinition {
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: Value) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_value(value)?)
    }
}
