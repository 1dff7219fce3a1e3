//! The wizard controller: current step, progress and gated transitions.

use super::builder::WizardBuilder;
use super::error::{CompletionError, WizardError};
use crate::binding::FieldBinding;
use crate::core::{State, StateHistory, StateTransition, WizardPosition};
use crate::resolver::{StepContext, StepResolver};
use crate::steps::{self, GateViolation, StepConfig, StepType};
use crate::store::{FormData, FormStore};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Host callback receiving the final form data.
pub type CompletionHook = Box<dyn FnMut(&FormData) -> Result<(), CompletionError> + Send>;

/// Result of a continue request.
#[derive(Clone, Debug, PartialEq)]
pub enum Advance {
    /// The gate is closed; nothing changed.
    Blocked(Vec<GateViolation>),

    /// Moved forward one step.
    Moved { from: usize, to: usize },

    /// The last step was continued and the completion callback ran.
    Completed,
}

/// Serializable view of a wizard.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub current_step_index: usize,
    pub form_data: FormData,
    pub intro_checked: bool,
}

/// What `render_current` displayed.
#[derive(Clone, Debug, PartialEq)]
pub struct Rendered {
    pub index: usize,
    pub step_id: String,
    pub renderer: String,
    pub placeholder: bool,
}

/// A running wizard.
///
/// Steps are a fixed, forward-only sequence. `request_next` moves one step
/// ahead when the current step's gate is open; on the last step it runs the
/// completion callback instead and the wizard becomes final. The index never
/// moves backwards and is left on the last step after completion.
pub struct Wizard {
    id: Uuid,
    steps: Vec<StepConfig>,
    store: FormStore,
    resolver: StepResolver,
    on_complete: Option<CompletionHook>,
    position: WizardPosition,
    current: usize,
    intro_checked: bool,
    attempts: usize,
    history: StateHistory<WizardPosition>,
}

impl Wizard {
    pub fn builder() -> WizardBuilder {
        WizardBuilder::new()
    }

    pub(crate) fn new(
        steps: Vec<StepConfig>,
        store: FormStore,
        resolver: StepResolver,
        on_complete: Option<CompletionHook>,
    ) -> Self {
        let id = Uuid::new_v4();
        debug!(wizard_id = %id, steps = steps.len(), "wizard created");
        Self {
            id,
            steps,
            store,
            resolver,
            on_complete,
            position: WizardPosition::Step(0),
            current: 0,
            intro_checked: false,
            attempts: 0,
            history: StateHistory::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn steps(&self) -> &[StepConfig] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn current_step_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> &StepConfig {
        &self.steps[self.current]
    }

    pub fn position(&self) -> WizardPosition {
        self.position
    }

    pub fn is_last_step(&self) -> bool {
        self.current + 1 == self.steps.len()
    }

    pub fn is_completed(&self) -> bool {
        self.position.is_final()
    }

    /// `(index + 1) / count * 100`.
    pub fn progress(&self) -> f64 {
        (self.current + 1) as f64 / self.steps.len() as f64 * 100.0
    }

    pub fn intro_checked(&self) -> bool {
        self.intro_checked
    }

    /// Set the intro consent flag.
    ///
    /// The flag is also written under the intro step's id so the final form
    /// data records it.
    pub fn set_intro_checked(&mut self, checked: bool) {
        self.intro_checked = checked;
        if let Some(intro) = self
            .steps
            .iter()
            .find(|step| step.step_type() == StepType::Intro)
        {
            self.store.write(intro.id(), Value::Bool(checked));
        }
    }

    /// Shared handle to the form store.
    pub fn store(&self) -> &FormStore {
        &self.store
    }

    pub fn form_data(&self) -> FormData {
        self.store.snapshot()
    }

    pub fn state(&self) -> WizardState {
        WizardState {
            current_step_index: self.current,
            form_data: self.store.snapshot(),
            intro_checked: self.intro_checked,
        }
    }

    pub fn history(&self) -> &StateHistory<WizardPosition> {
        &self.history
    }

    /// Binding for the current step's single input, freshly mounted.
    pub fn bind_current(&self) -> FieldBinding {
        FieldBinding::for_step(self.current_step(), self.store.clone())
    }

    /// Whether the continue action should be enabled.
    pub fn can_continue(&self) -> bool {
        !self.is_completed()
            && steps::can_continue(self.current_step(), &self.store.snapshot(), self.intro_checked)
    }

    /// Why the continue action is disabled, empty when it is enabled.
    ///
    /// Agrees with [`can_continue`](Self::can_continue): a completed wizard
    /// reports [`GateViolation::WizardCompleted`].
    pub fn blockers(&self) -> Vec<GateViolation> {
        if self.is_completed() {
            return vec![GateViolation::WizardCompleted];
        }
        steps::violations(self.current_step(), &self.store.snapshot(), self.intro_checked)
    }

    /// Continue from the current step.
    ///
    /// A closed gate is a no-op reported as [`Advance::Blocked`]. On the last
    /// step the completion callback receives the full snapshot; its error is
    /// returned as-is and leaves the wizard on the last step so the host can
    /// retry. After completion the store is disposed.
    pub fn request_next(&mut self) -> Result<Advance, WizardError> {
        if self.position.is_final() {
            return Err(WizardError::AlreadyCompleted);
        }

        self.attempts += 1;
        let snapshot = self.store.snapshot();
        let blockers = steps::violations(&self.steps[self.current], &snapshot, self.intro_checked);
        if !blockers.is_empty() {
            debug!(
                wizard_id = %self.id,
                step = self.current,
                blockers = blockers.len(),
                "continue blocked"
            );
            return Ok(Advance::Blocked(blockers));
        }

        if !self.is_last_step() {
            let from = self.current;
            let to = from + 1;
            self.transition(WizardPosition::Step(to));
            self.current = to;
            info!(wizard_id = %self.id, from, to, "advanced to next step");
            return Ok(Advance::Moved { from, to });
        }

        if let Some(hook) = self.on_complete.as_mut() {
            hook(&snapshot).map_err(WizardError::Completion)?;
        }
        self.transition(WizardPosition::Completed);
        self.store.dispose();
        let elapsed_ms = self
            .history
            .duration()
            .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));
        info!(
            wizard_id = %self.id,
            entries = snapshot.len(),
            elapsed_ms,
            "wizard completed"
        );
        Ok(Advance::Completed)
    }

    /// Resolve and render the current step.
    ///
    /// A step that fails to load or to render is replaced by a placeholder for
    /// this render; the failure is logged and the wizard carries on.
    pub async fn render_current(&mut self) -> Rendered {
        let index = self.current;
        let step_type = self.steps[index].step_type();
        let renderer = self.resolver.resolve(step_type).await;

        let ctx = StepContext {
            step: &self.steps[index],
            store: &self.store,
            index,
            step_count: self.steps.len(),
            progress: self.progress(),
        };

        let renderer = match renderer.render(&ctx) {
            Ok(()) => renderer,
            Err(err) => {
                warn!(
                    wizard_id = %self.id,
                    step_id = ctx.step.id(),
                    step_type = %step_type,
                    error = %err,
                    "step render failed, showing placeholder"
                );
                StepResolver::placeholder(step_type)
            }
        };

        Rendered {
            index,
            step_id: ctx.step.id().to_string(),
            renderer: renderer.name().to_string(),
            placeholder: renderer.is_placeholder(),
        }
    }

    fn transition(&mut self, to: WizardPosition) {
        self.history = self.history.record(StateTransition {
            from: self.position,
            to,
            timestamp: Utc::now(),
            attempt: self.attempts,
        });
        self.position = to;
        self.attempts = 0;
    }
}

impl Drop for Wizard {
    fn drop(&mut self) {
        self.store.dispose();
    }
}
