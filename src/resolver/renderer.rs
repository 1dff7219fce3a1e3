//! The contract step implementations fulfil.

use super::error::RenderError;
use crate::steps::{StepConfig, StepType};
use crate::store::FormStore;
use std::sync::Arc;

/// Shared handle to a loaded step implementation.
pub type SharedRenderer = Arc<dyn StepRenderer>;

/// What a step implementation receives when asked to render.
///
/// The store handle is how the step writes its answers, usually through
/// [`FieldBinding`](crate::binding::FieldBinding)s keyed by the step id or
/// its composite keys.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub step: &'a StepConfig,
    pub store: &'a FormStore,
    pub index: usize,
    pub step_count: usize,
    pub progress: f64,
}

/// A renderable step implementation.
///
/// The engine does not care how a step looks, only that it eventually writes
/// to the store under the right keys.
pub trait StepRenderer: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    fn render(&self, ctx: &StepContext<'_>) -> Result<(), RenderError>;

    /// Whether this is the stand-in used when the real implementation is unavailable.
    fn is_placeholder(&self) -> bool {
        false
    }
}

/// Skeleton shown in place of a step whose implementation failed.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderRenderer {
    pub step_type: StepType,
}

impl StepRenderer for PlaceholderRenderer {
    fn name(&self) -> &str {
        "placeholder"
    }

    fn render(&self, _ctx: &StepContext<'_>) -> Result<(), RenderError> {
        Ok(())
    }

    fn is_placeholder(&self) -> bool {
        true
    }
}

/// No-op implementation for hosts that drive the engine without a UI.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessRenderer;

impl StepRenderer for HeadlessRenderer {
    fn name(&self) -> &str {
        "headless"
    }

    fn render(&self, _ctx: &StepContext<'_>) -> Result<(), RenderError> {
        Ok(())
    }
}
