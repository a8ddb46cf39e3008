//! Synchronous state store.
//!
//! [`Store<S>`] holds one value of widget state and replaces it wholesale on
//! every transition. Subscribers are notified synchronously, after the new
//! state is in place, with both the previous and the current snapshot so they
//! can detect which fields changed.
//!
//! # Example
//!
//! ```
//! use horizon_sheet_core::Store;
//!
//! let store = Store::new(0_i32);
//! let _guard = store.subscribe(|change| {
//!     println!("{} -> {}", change.previous, change.current);
//! });
//!
//! store.update(|count| Some(count + 1));
//! assert_eq!(store.get_state(), 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::logging::targets;
use crate::signal::{ConnectionGuard, Signal};

/// A single state transition as seen by subscribers.
#[derive(Debug, Clone)]
pub struct StateChange<S> {
    /// The state before the transition.
    pub previous: S,
    /// The state after the transition.
    pub current: S,
}

/// A process-wide (per widget instance) state container.
///
/// `S` is expected to be cheap to clone (shared, copy-on-write fields), since
/// every read hands out a snapshot.
pub struct Store<S> {
    state: RwLock<S>,
    changed: Signal<StateChange<S>>,
    transitions: AtomicU64,
}

impl<S: Clone + Send + Sync + 'static> Store<S> {
    /// Create a store holding `initial`.
    pub fn new(initial: S) -> Self {
        Self {
            state: RwLock::new(initial),
            changed: Signal::new(),
            transitions: AtomicU64::new(0),
        }
    }

    /// Returns a snapshot of the current state.
    pub fn get_state(&self) -> S {
        self.state.read().clone()
    }

    /// Reads the current state without cloning it.
    pub fn with_state<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.read())
    }

    /// Replace the state and notify subscribers.
    pub fn set_state(&self, next: S) {
        self.update(move |_| Some(next));
    }

    /// Compute the next state from the current one.
    ///
    /// Returning `None` from `f` means "no transition": the state is left
    /// untouched and no subscriber is notified. Returns whether a transition
    /// happened.
    #[tracing::instrument(skip_all, target = "horizon_sheet_core::store", level = "trace")]
    pub fn update(&self, f: impl FnOnce(&S) -> Option<S>) -> bool {
        let change = {
            let mut state = self.state.write();
            let Some(next) = f(&state) else {
                return false;
            };
            let previous = std::mem::replace(&mut *state, next);
            StateChange {
                previous,
                current: state.clone(),
            }
        };

        let count = self.transitions.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!(target: targets::STORE, transition = count, "state replaced");

        // The write lock is released, so subscribers may read the store.
        self.changed.emit(change);
        true
    }

    /// Subscribe to transitions. The subscription ends when the guard drops.
    pub fn subscribe<F>(&self, f: F) -> ConnectionGuard
    where
        F: Fn(&StateChange<S>) + Send + Sync + 'static,
    {
        self.changed.connect_scoped(f)
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.changed.connection_count()
    }

    /// Number of transitions applied since creation.
    pub fn transition_count(&self) -> u64 {
        self.transitions.load(Ordering::SeqCst)
    }
}

impl<S: Clone + Default + Send + Sync + 'static> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.state.read())
            .field("transitions", &self.transitions.load(Ordering::SeqCst))
            .finish()
    }
}
