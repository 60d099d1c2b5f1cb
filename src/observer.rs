//! Diagnostic observers for resolution events.
//!
//! Observers see every `make` call, nested ones included. Calls are made
//! synchronously during resolution, so implementations should stay cheap.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::error::DiError;
use crate::key::Key;

/// Observer trait for resolution events.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Container, DiObserver, Key, Producer};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct CountingObserver {
///     resolved: AtomicUsize,
/// }
///
/// impl DiObserver for CountingObserver {
///     fn resolving(&self, _key: &Key) {}
///
///     fn resolved(&self, _key: &Key, _duration: Duration) {
///         self.resolved.fetch_add(1, Ordering::SeqCst);
///     }
/// }
///
/// let observer = Arc::new(CountingObserver::default());
/// let container = Container::new();
/// container.add_observer(observer.clone());
/// container.bind("answer", Producer::factory(|_| Ok(42u32)));
///
/// container.make("answer").unwrap();
/// assert_eq!(observer.resolved.load(Ordering::SeqCst), 1);
/// ```
pub trait DiObserver: Send + Sync {
    /// Called before a key is resolved.
    fn resolving(&self, key: &Key);

    /// Called after a key resolved successfully.
    fn resolved(&self, key: &Key, duration: Duration);

    /// Called when resolving a key failed. The error still propagates.
    fn failed(&self, key: &Key, error: &DiError) {
        let _ = (key, error);
    }
}

/// Observer that forwards resolution events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl DiObserver for TracingObserver {
    fn resolving(&self, key: &Key) {
        tracing::trace!(key = %key, "resolving");
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        tracing::debug!(key = %key, elapsed_us = duration.as_micros() as u64, "resolved");
    }

    fn failed(&self, key: &Key, error: &DiError) {
        tracing::warn!(key = %key, error = %error, "resolution failed");
    }
}

#[derive(Default)]
pub(crate) struct Observers {
    observers: RwLock<Vec<Arc<dyn DiObserver>>>,
}

impl Observers {
    pub(crate) fn add(&self, observer: Arc<dyn DiObserver>) {
        self.observers.write().push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.read().is_empty()
    }

    pub(crate) fn resolving(&self, key: &Key) {
        for observer in self.observers.read().iter() {
            observer.resolving(key);
        }
    }

    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for observer in self.observers.read().iter() {
            observer.resolved(key, duration);
        }
    }

    pub(crate) fn failed(&self, key: &Key, error: &DiError) {
        for observer in self.observers.read().iter() {
            observer.failed(key, error);
        }
    }
}
