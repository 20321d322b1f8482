//! In-memory state storage for testing.
//!
//! This module provides a thread-safe in-memory implementation of the
//! StateStore trait, primarily for use in unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::core::AppState;
use crate::error::Result;
use crate::storage::StateStore;

/// In-memory state store for testing.
///
/// Thread-safe implementation using `RwLock<Option<AppState>>`.
/// The state is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    /// The saved state, `None` until the first save.
    state: RwLock<Option<AppState>>,
    /// Number of successful saves.
    saves: AtomicUsize,
}

impl MemoryStateStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `state`.
    pub fn with_state(state: AppState) -> Self {
        Self {
            state: RwLock::new(Some(state)),
            saves: AtomicUsize::new(0),
        }
    }

    /// The currently stored state, if any.
    pub fn snapshot(&self) -> Option<AppState> {
        self.state.read().unwrap().clone()
    }

    /// How many times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<AppState> {
        Ok(self.snapshot().unwrap_or_default())
    }

    fn save(&self, state: &AppState) -> Result<()> {
        *self.state.write().unwrap() = Some(state.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn exists(&self) -> Result<bool> {
        Ok(self.state.read().unwrap().is_some())
    }
}
