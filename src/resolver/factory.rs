//! Fallible, lazily run factories for step implementations.

use super::error::ResolveError;
use super::renderer::{SharedRenderer, StepRenderer};
use std::fmt;
use std::sync::Arc;
use stillwater::effect::BoxedEffect;
use stillwater::prelude::*;

/// Type alias for loader functions.
/// Each call creates a fresh effect; nothing runs until the resolver runs it.
pub type LoadAction = Arc<dyn Fn() -> BoxedEffect<SharedRenderer, ResolveError, ()> + Send + Sync>;

/// Loads the implementation of one step type.
#[derive(Clone)]
pub struct StepFactory {
    load: LoadAction,
}

impl StepFactory {
    /// Wrap an effect-producing loader.
    pub fn new<F>(load: F) -> Self
    where
        F: Fn() -> BoxedEffect<SharedRenderer, ResolveError, ()> + Send + Sync + 'static,
    {
        Self {
            load: Arc::new(load),
        }
    }

    /// A factory that yields an already constructed implementation.
    pub fn ready<R>(renderer: R) -> Self
    where
        R: StepRenderer + 'static,
    {
        let renderer: SharedRenderer = Arc::new(renderer);
        Self::new(move || pure(Arc::clone(&renderer)).boxed())
    }

    /// A factory from a plain fallible constructor.
    pub fn from_fn<F>(construct: F) -> Self
    where
        F: Fn() -> Result<SharedRenderer, ResolveError> + Send + Sync + 'static,
    {
        let construct = Arc::new(construct);
        Self::new(move || {
            let construct = Arc::clone(&construct);
            from_fn(move |_: &()| construct()).boxed()
        })
    }

    /// A factory that always fails, e.g. for a step type disabled in a build.
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(move || fail(ResolveError::LoadFailed(message.clone())).boxed())
    }

    /// A fresh effect that loads the implementation when run.
    pub fn load(&self) -> BoxedEffect<SharedRenderer, ResolveError, ()> {
        (self.load)()
    }
}

impl fmt::Debug for StepFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StepFactory(..)")
    }
}
