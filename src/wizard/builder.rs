//! Builder for constructing wizards.

use super::config::{WizardConfig, WizardDefinition};
use super::controller::{CompletionHook, Wizard};
use super::error::{BuildError, CompletionError};
use crate::resolver::StepResolver;
use crate::steps::{composite_key, SignatureConsentStep, StepConfig, StepKind};
use crate::store::{ChangeNotifier, FormData, FormStore};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Builder for constructing wizards with a fluent API.
///
/// Configuration mistakes (no steps, duplicate ids, step types without an
/// implementation) fail here rather than while the wizard runs.
pub struct WizardBuilder {
    steps: Vec<StepConfig>,
    config: WizardConfig,
    on_change: Option<ChangeNotifier>,
    on_complete: Option<CompletionHook>,
    resolver: Option<StepResolver>,
}

impl WizardBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            config: WizardConfig::default(),
            on_change: None,
            on_complete: None,
            resolver: None,
        }
    }

    /// Append one step.
    pub fn step(mut self, step: StepConfig) -> Self {
        self.steps.push(step);
        self
    }

    /// Append several steps, in order.
    pub fn steps(mut self, steps: Vec<StepConfig>) -> Self {
        self.steps.extend(steps);
        self
    }

    /// Take steps and config from a definition.
    pub fn definition(self, definition: WizardDefinition) -> Self {
        self.config(definition.config).steps(definition.steps)
    }

    pub fn config(mut self, config: WizardConfig) -> Self {
        self.config = config;
        self
    }

    pub fn debounce(mut self, delay: Duration) -> Self {
        self.config.debounce_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Called with the full snapshot once writes have been quiet for the debounce window.
    ///
    /// Requires building inside a tokio runtime.
    pub fn on_change<F>(mut self, notifier: F) -> Self
    where
        F: Fn(&FormData) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(notifier));
        self
    }

    /// Called once with the final snapshot when the last step is continued.
    ///
    /// An error returned here is handed back to the caller of `request_next`.
    pub fn on_complete<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&FormData) -> Result<(), CompletionError> + Send + 'static,
    {
        self.on_complete = Some(Box::new(hook));
        self
    }

    /// Step implementations. Defaults to [`StepResolver::headless`].
    pub fn resolver(mut self, resolver: StepResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Build the wizard.
    /// Returns an error if the step list is not a valid wizard.
    pub fn build(self) -> Result<Wizard, BuildError> {
        if self.steps.is_empty() {
            return Err(BuildError::NoSteps);
        }
        check_keys(&self.steps)?;

        let resolver = self.resolver.unwrap_or_else(StepResolver::headless);
        if let Some(step) = self
            .steps
            .iter()
            .find(|step| !resolver.is_registered(step.step_type()))
        {
            return Err(BuildError::UnregisteredStepType {
                step_id: step.id().to_string(),
                step_type: step.step_type(),
            });
        }

        let store = match self.on_change {
            Some(notifier) => {
                FormStore::with_notifier(self.config.debounce(), move |data: &FormData| {
                    notifier(data)
                })?
            }
            None => FormStore::new(),
        };

        Ok(Wizard::new(self.steps, store, resolver, self.on_complete))
    }
}

impl Default for WizardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// Step ids must be unique and non-empty, and no derived key may shadow
// another step's key.
fn check_keys(steps: &[StepConfig]) -> Result<(), BuildError> {
    let mut ids = HashSet::new();
    for (index, step) in steps.iter().enumerate() {
        if step.id().is_empty() {
            return Err(BuildError::EmptyStepId { index });
        }
        if !ids.insert(step.id()) {
            return Err(BuildError::DuplicateStepId(step.id().to_string()));
        }
    }

    let mut derived = HashSet::new();
    for step in steps {
        for key in derived_keys(step) {
            if ids.contains(key.as_str()) || !derived.insert(key.clone()) {
                return Err(BuildError::KeyCollision {
                    step_id: step.id().to_string(),
                    key,
                });
            }
        }
    }
    Ok(())
}

fn derived_keys(step: &StepConfig) -> Vec<String> {
    match step.kind() {
        StepKind::QuestionsGroup(group) => group
            .questions
            .iter()
            .map(|question| composite_key(step.id(), &question.key))
            .collect(),
        StepKind::SignatureConsent(_) => vec![
            SignatureConsentStep::consent_key(step.id()),
            SignatureConsentStep::signature_key(step.id()),
        ],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{HeadlessRenderer, StepFactory};
    use crate::steps::{GroupQuestion, StepType};

    #[test]
    fn builder_requires_steps() {
        let result = WizardBuilder::new().build();
        assert!(matches!(result, Err(BuildError::NoSteps)));
    }

    #[test]
    fn builder_rejects_duplicate_ids() {
        let result = WizardBuilder::new()
            .step(StepConfig::text("name", "Name"))
            .step(StepConfig::email("name", "Email"))
            .build();

        assert!(matches!(result, Err(BuildError::DuplicateStepId(id)) if id == "name"));
    }

    #[test]
    fn builder_rejects_empty_ids() {
        let result = WizardBuilder::new()
            .step(StepConfig::text("name", "Name"))
            .step(StepConfig::text("", "Nameless"))
            .build();

        assert!(matches!(result, Err(BuildError::EmptyStepId { index: 1 })));
    }

    #[test]
    fn builder_rejects_composite_key_collisions() {
        let result = WizardBuilder::new()
            .step(StepConfig::questions_group(
                "grp",
                "Group",
                vec![GroupQuestion::new("q1", "Q1")],
            ))
            .step(StepConfig::text("grp_q1", "Clash"))
            .build();

        assert!(matches!(
            result,
            Err(BuildError::KeyCollision { key, .. }) if key == "grp_q1"
        ));
    }

    #[test]
    fn builder_rejects_unregistered_step_types() {
        let resolver =
            StepResolver::new().register(StepType::Text, StepFactory::ready(HeadlessRenderer));
        let result = WizardBuilder::new()
            .step(StepConfig::text("name", "Name"))
            .step(StepConfig::rating("score", "Score"))
            .resolver(resolver)
            .build();

        assert!(matches!(
            result,
            Err(BuildError::UnregisteredStepType { step_type: StepType::Rating, .. })
        ));
    }

    #[test]
    fn change_notifier_needs_runtime() {
        let result = WizardBuilder::new()
            .step(StepConfig::text("name", "Name"))
            .on_change(|_| {})
            .build();

        assert!(matches!(result, Err(BuildError::Store(_))));
    }

    #[test]
    fn fluent_api_builds_wizard() {
        let wizard = WizardBuilder::new()
            .steps(vec![
                StepConfig::intro("intro", "Welcome"),
                StepConfig::text("name", "Name"),
            ])
            .debounce(Duration::from_millis(50))
            .on_complete(|_| Ok(()))
            .build()
            .unwrap();

        assert_eq!(wizard.step_count(), 2);
        assert_eq!(wizard.current_step_index(), 0);
    }

    #[test]
    fn definition_supplies_steps_and_config() {
        let definition = WizardDefinition {
            config: WizardConfig { debounce_ms: 10 },
            steps: vec![StepConfig::description("about", "About")],
        };
        let wizard = WizardBuilder::new().definition(definition).build().unwrap();
        assert_eq!(wizard.current_step().id(), "about");
    }
}
