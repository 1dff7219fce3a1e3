//! Step resolution and rendering errors.

use thiserror::Error;

/// A step implementation could not be loaded
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolveError {
    #[error("Step implementation failed to load: {0}")]
    LoadFailed(String),
}

/// A step implementation failed while rendering
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RenderError {
    #[error("Step render failed: {0}")]
    Failed(String),
}
