//! Lazy, fault-isolated resolution of step implementations.
//!
//! Each step type maps to its own [`StepFactory`]. A factory runs the first
//! time its type is resolved and the result is memoized. When a factory
//! fails, the resolver substitutes a [`PlaceholderRenderer`] for that type
//! only; the failure is logged and never reaches the wizard controller.

mod error;
mod factory;
mod renderer;

pub use error::{RenderError, ResolveError};
pub use factory::{LoadAction, StepFactory};
pub use renderer::{
    HeadlessRenderer, PlaceholderRenderer, SharedRenderer, StepContext, StepRenderer,
};

use crate::steps::StepType;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use stillwater::effect::Effect;
use tracing::{debug, warn};

/// Registry from step type to implementation factory, with a per-type cache.
#[derive(Default)]
pub struct StepResolver {
    factories: HashMap<StepType, StepFactory>,
    loaded: HashMap<StepType, SharedRenderer>,
}

impl StepResolver {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every step type resolves to [`HeadlessRenderer`].
    pub fn headless() -> Self {
        Self::uniform(HeadlessRenderer)
    }

    /// Every step type resolves to the same implementation.
    pub fn uniform<R>(renderer: R) -> Self
    where
        R: StepRenderer + 'static,
    {
        let factory = StepFactory::ready(renderer);
        StepType::ALL
            .iter()
            .fold(Self::new(), |resolver, ty| resolver.register(*ty, factory.clone()))
    }

    /// Register (or replace) the factory for a step type.
    ///
    /// Replacing a factory drops any implementation already loaded for that type.
    pub fn register(mut self, step_type: StepType, factory: StepFactory) -> Self {
        self.insert(step_type, factory);
        self
    }

    pub fn insert(&mut self, step_type: StepType, factory: StepFactory) {
        self.loaded.remove(&step_type);
        self.factories.insert(step_type, factory);
    }

    pub fn is_registered(&self, step_type: StepType) -> bool {
        self.factories.contains_key(&step_type)
    }

    /// Whether `step_type` has been resolved already.
    pub fn is_loaded(&self, step_type: StepType) -> bool {
        self.loaded.contains_key(&step_type)
    }

    /// Implementation for `step_type`, loading it on first use.
    ///
    /// Never fails: a missing or failing factory yields a placeholder, which
    /// is memoized like any other result.
    pub async fn resolve(&mut self, step_type: StepType) -> SharedRenderer {
        if let Some(renderer) = self.loaded.get(&step_type) {
            debug!(step_type = %step_type, "step implementation already loaded");
            return Arc::clone(renderer);
        }

        let renderer = match self.factories.get(&step_type) {
            Some(factory) => match factory.load().run(&()).await {
                Ok(renderer) => {
                    debug!(step_type = %step_type, renderer = renderer.name(), "step implementation loaded");
                    renderer
                }
                Err(err) => {
                    warn!(step_type = %step_type, error = %err, "step implementation failed to load, using placeholder");
                    Self::placeholder(step_type)
                }
            },
            None => {
                warn!(step_type = %step_type, "no step implementation registered, using placeholder");
                Self::placeholder(step_type)
            }
        };

        self.loaded.insert(step_type, Arc::clone(&renderer));
        renderer
    }

    pub fn placeholder(step_type: StepType) -> SharedRenderer {
        Arc::new(PlaceholderRenderer { step_type })
    }
}

impl fmt::Debug for StepResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepResolver")
            .field("registered", &self.factories.keys().collect::<Vec<_>>())
            .field("loaded", &self.loaded.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Named(&'static str);

    impl StepRenderer for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn render(&self, _ctx: &StepContext<'_>) -> Result<(), RenderError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn resolves_registered_implementation() {
        let mut resolver = StepResolver::new()
            .register(StepType::Text, StepFactory::ready(Named("text-input")));

        let renderer = resolver.resolve(StepType::Text).await;
        assert_eq!(renderer.name(), "text-input");
        assert!(!renderer.is_placeholder());
    }

    #[tokio::test]
    async fn failed_load_degrades_to_placeholder_for_that_type_only() {
        let mut resolver = StepResolver::headless()
            .register(StepType::FileUpload, StepFactory::failing("chunk error"));

        let broken = resolver.resolve(StepType::FileUpload).await;
        let fine = resolver.resolve(StepType::Text).await;

        assert!(broken.is_placeholder());
        assert!(!fine.is_placeholder());
        assert_eq!(fine.name(), "headless");
    }

    #[tokio::test]
    async fn unregistered_type_degrades_to_placeholder() {
        let mut resolver = StepResolver::new();
        let renderer = resolver.resolve(StepType::Rating).await;
        assert!(renderer.is_placeholder());
        assert!(resolver.is_loaded(StepType::Rating));
    }

    #[tokio::test]
    async fn resolution_is_memoized_per_type() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);
        let factory = StepFactory::from_fn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            let renderer: SharedRenderer = Arc::new(Named("counted"));
            Ok(renderer)
        });
        let mut resolver = StepResolver::new().register(StepType::Email, factory);

        let first = resolver.resolve(StepType::Email).await;
        let second = resolver.resolve(StepType::Email).await;

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn failures_are_memoized_too() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);
        let factory = StepFactory::from_fn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(ResolveError::LoadFailed("offline".into()))
        });
        let mut resolver = StepResolver::new().register(StepType::Date, factory);

        assert!(resolver.resolve(StepType::Date).await.is_placeholder());
        assert!(resolver.resolve(StepType::Date).await.is_placeholder());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn re_registering_drops_cached_implementation() {
        let mut resolver = StepResolver::new().register(StepType::Text, StepFactory::failing("x"));
        assert!(resolver.resolve(StepType::Text).await.is_placeholder());

        resolver.insert(StepType::Text, StepFactory::ready(Named("fixed")));
        assert!(!resolver.is_loaded(StepType::Text));
        assert_eq!(resolver.resolve(StepType::Text).await.name(), "fixed");
    }

    #[test]
    fn headless_registers_every_type() {
        let resolver = StepResolver::headless();
        assert!(StepType::ALL.iter().all(|ty| resolver.is_registered(*ty)));
    }
}
