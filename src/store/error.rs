//! Form store errors.

use thiserror::Error;

/// Errors that can occur when constructing a form store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Debounced notifications need a tokio runtime for their timer tasks
    #[error("Change notifications require a running tokio runtime")]
    NoRuntime,
}
