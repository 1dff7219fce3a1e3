//! The wizard's single mutable resource: the form data store.
//!
//! `FormStore` is a dumb, observable map. It performs no validation; the
//! step gate and field bindings read its snapshots.

mod data;
mod error;
mod form_store;

pub use data::FormData;
pub use error::StoreError;
pub use form_store::{ChangeNotifier, FormStore, DEFAULT_DEBOUNCE};
