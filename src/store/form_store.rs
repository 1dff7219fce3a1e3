//! Shared, observable form store with a debounced change notifier.

use super::data::FormData;
use super::error::StoreError;
use parking_lot::Mutex;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Default quiet period before a change notification fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Callback receiving the full snapshot once writes go quiet.
pub type ChangeNotifier = Arc<dyn Fn(&FormData) + Send + Sync>;

/// Handle to the wizard's form data.
///
/// Cloning the handle shares the same store. `write` is the only way to
/// change data; reads return owned copies taken under a short lock.
///
/// When a notifier is attached, each write cancels the pending notification
/// and schedules a new one `delay` later, so a burst of writes produces a
/// single callback carrying the latest snapshot.
#[derive(Clone)]
pub struct FormStore {
    shared: Arc<Shared>,
}

struct Shared {
    inner: Mutex<Inner>,
    notifier: Option<Debouncer>,
}

struct Debouncer {
    callback: ChangeNotifier,
    delay: Duration,
    runtime: Handle,
}

#[derive(Default)]
struct Inner {
    data: FormData,
    pending: Option<JoinHandle<()>>,
    generation: u64,
    disposed: bool,
}

impl FormStore {
    /// A store without change notifications.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner::default()),
                notifier: None,
            }),
        }
    }

    /// A store that reports changes through `notifier` after `delay` of quiet.
    ///
    /// Must be called from within a tokio runtime; the timer tasks are spawned
    /// on that runtime.
    pub fn with_notifier<F>(delay: Duration, notifier: F) -> Result<Self, StoreError>
    where
        F: Fn(&FormData) + Send + Sync + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| StoreError::NoRuntime)?;
        Ok(Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner::default()),
                notifier: Some(Debouncer {
                    callback: Arc::new(notifier),
                    delay,
                    runtime,
                }),
            }),
        })
    }

    /// Replace the value at `key` and restart the notification timer.
    ///
    /// Ignored once the store has been disposed.
    pub fn write(&self, key: impl Into<String>, value: Value) {
        let key = key.into();
        let mut inner = self.shared.inner.lock();
        if inner.disposed {
            warn!(key = %key, "write to disposed form store ignored");
            return;
        }

        debug!(key = %key, "form value written");
        inner.data.insert(key, value);

        if let Some(debouncer) = &self.shared.notifier {
            self.schedule(debouncer, &mut inner);
        }
    }

    pub fn read(&self, key: &str) -> Option<Value> {
        self.shared.inner.lock().data.get(key).cloned()
    }

    /// Copy of the whole mapping.
    pub fn snapshot(&self) -> FormData {
        self.shared.inner.lock().data.clone()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.shared.inner.lock().data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.shared.inner.lock().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.inner.lock().data.is_empty()
    }

    pub fn has_pending_notification(&self) -> bool {
        self.shared
            .inner
            .lock()
            .pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Cancel any pending notification and stop accepting writes.
    ///
    /// Data stays readable. Calling this more than once is harmless.
    pub fn dispose(&self) {
        let mut inner = self.shared.inner.lock();
        if let Some(pending) = inner.pending.take() {
            pending.abort();
            debug!("pending change notification cancelled");
        }
        inner.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.inner.lock().disposed
    }

    fn schedule(&self, debouncer: &Debouncer, inner: &mut Inner) {
        if let Some(pending) = inner.pending.take() {
            pending.abort();
        }
        inner.generation += 1;

        let generation = inner.generation;
        let delay = debouncer.delay;
        let shared = Arc::downgrade(&self.shared);
        inner.pending = Some(debouncer.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            fire(shared, generation);
        }));
    }
}

// Runs on the timer task. A stale generation means a later write won the race
// against `abort`.
fn fire(shared: Weak<Shared>, generation: u64) {
    let Some(shared) = shared.upgrade() else {
        return;
    };

    let snapshot = {
        let mut inner = shared.inner.lock();
        if inner.disposed || inner.generation != generation {
            return;
        }
        inner.pending = None;
        inner.data.clone()
    };

    if let Some(debouncer) = &shared.notifier {
        trace!(entries = snapshot.len(), "firing change notification");
        (debouncer.callback)(&snapshot);
    }
}

impl Default for FormStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Some(pending) = self.inner.get_mut().pending.take() {
            pending.abort();
        }
    }
}

impl fmt::Debug for FormStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.inner.lock();
        f.debug_struct("FormStore")
            .field("entries", &inner.data.len())
            .field("disposed", &inner.disposed)
            .field("debounced", &self.shared.notifier.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recording_store(delay: Duration) -> (FormStore, Arc<Mutex<Vec<FormData>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let store = FormStore::with_notifier(delay, move |data: &FormData| {
            sink.lock().push(data.clone());
        })
        .unwrap();
        (store, seen)
    }

    #[test]
    fn write_replaces_value() {
        let store = FormStore::new();
        store.write("time", json!({"hour": 9, "minute": 30}));
        store.write("time", json!({"hour": 10}));

        assert_eq!(store.read("time"), Some(json!({"hour": 10})));
        assert_eq!(store.read("missing"), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clones_share_the_same_data() {
        let store = FormStore::new();
        let handle = store.clone();
        handle.write("name", json!("Ada"));

        assert!(store.contains("name"));
        assert_eq!(store.snapshot().get("name"), Some(&json!("Ada")));
    }

    #[test]
    fn notifier_requires_a_runtime() {
        let result = FormStore::with_notifier(DEFAULT_DEBOUNCE, |_: &FormData| {});
        assert!(matches!(result, Err(StoreError::NoRuntime)));
    }

    #[test]
    fn disposed_store_ignores_writes() {
        let store = FormStore::new();
        store.write("a", json!(1));
        store.dispose();
        store.write("a", json!(2));
        store.write("b", json!(3));

        assert!(store.is_disposed());
        assert_eq!(store.read("a"), Some(json!(1)));
        assert!(!store.contains("b"));
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_writes_notifies_once_with_last_value() {
        let (store, seen) = recording_store(Duration::from_millis(300));

        for i in 0..5 {
            store.write("name", json!(format!("A{i}")));
            tokio::time::advance(Duration::from_millis(100)).await;
        }
        assert!(seen.lock().is_empty());
        assert!(store.has_pending_notification());

        tokio::time::sleep(Duration::from_millis(301)).await;

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].get("name"), Some(&json!("A4")));
        assert!(!store.has_pending_notification());
    }

    #[tokio::test(start_paused = true)]
    async fn notification_carries_full_snapshot() {
        let (store, seen) = recording_store(Duration::from_millis(50));
        store.write("a", json!(1));
        store.write("b", json!(2));

        tokio::time::sleep(Duration::from_millis(60)).await;

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn separate_quiet_periods_notify_separately() {
        let (store, seen) = recording_store(Duration::from_millis(100));

        store.write("a", json!(1));
        tokio::time::sleep(Duration::from_millis(150)).await;
        store.write("a", json!(2));
        tokio::time::sleep(Duration::from_millis(150)).await;

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].get("a"), Some(&json!(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_cancels_pending_notification() {
        let (store, seen) = recording_store(Duration::from_millis(300));
        store.write("a", json!(1));
        store.dispose();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(seen.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_store_cancels_pending_notification() {
        let (store, seen) = recording_store(Duration::from_millis(300));
        store.write("a", json!(1));
        drop(store);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(seen.lock().is_empty());
    }
}
