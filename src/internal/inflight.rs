//! Cross-thread deadlock detection for single-flight builds.
//!
//! A thread that waits on a shared build another thread owns registers the
//! wait here first. Following the chain owner -> awaited key -> owner back
//! to the current thread means the two builds wait on each other, and the
//! wait is refused with [`DiError::Circular`] instead of blocking forever.

use std::collections::HashMap;
use std::thread::{self, ThreadId};

use parking_lot::Mutex;

use crate::error::{DiError, DiResult};
use crate::key::Key;

#[derive(Default)]
struct State {
    owners: HashMap<Key, ThreadId, ahash::RandomState>,
    waiting: HashMap<ThreadId, Key, ahash::RandomState>,
}

#[derive(Default)]
pub(crate) struct InFlight {
    state: Mutex<State>,
}

impl InFlight {
    /// Registers the current thread as waiting for `key`.
    pub(crate) fn wait_for(&self, key: &Key) -> DiResult<WaitGuard<'_>> {
        let me = thread::current().id();
        let mut state = self.state.lock();

        let mut path = vec![key.to_string()];
        let mut current = key.clone();
        // Each thread waits on at most one key, so the chain is bounded.
        for _ in 0..=state.waiting.len() {
            let owner = match state.owners.get(&current) {
                Some(owner) => *owner,
                None => break,
            };
            if owner == me {
                path.insert(0, current.to_string());
                tracing::debug!(path = %path.join(" -> "), "shared builds wait on each other");
                return Err(DiError::Circular(path));
            }
            match state.waiting.get(&owner) {
                Some(next) => {
                    path.push(next.to_string());
                    current = next.clone();
                }
                None => break,
            }
        }

        state.waiting.insert(me, key.clone());
        Ok(WaitGuard { in_flight: self, thread: me })
    }

    /// Marks the current thread as the builder of `key`.
    pub(crate) fn own(&self, key: &Key) -> OwnGuard<'_> {
        let me = thread::current().id();
        let mut state = self.state.lock();
        state.waiting.remove(&me);
        state.owners.insert(key.clone(), me);
        OwnGuard {
            in_flight: self,
            key: key.clone(),
        }
    }
}

pub(crate) struct WaitGuard<'a> {
    in_flight: &'a InFlight,
    thread: ThreadId,
}

impl Drop for WaitGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.state.lock().waiting.remove(&self.thread);
    }
}

pub(crate) struct OwnGuard<'a> {
    in_flight: &'a InFlight,
    key: Key,
}

impl Drop for OwnGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.state.lock().owners.remove(&self.key);
    }
}
