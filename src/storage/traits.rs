//! State storage traits for Grain.
//!
//! This module defines the `StateStore` trait for state persistence.

use std::sync::Arc;

use crate::core::AppState;
use crate::error::Result;

/// Trait for state storage backends.
///
/// Grain keeps a single state document. A backend that has never been
/// written to loads as a fresh, empty state.
pub trait StateStore: Send + Sync {
    /// Load the persisted state.
    ///
    /// Returns a fresh state if nothing has been saved yet.
    fn load(&self) -> Result<AppState>;

    /// Persist the state, replacing whatever was stored.
    fn save(&self, state: &AppState) -> Result<()>;

    /// Check whether any state has been saved.
    fn exists(&self) -> Result<bool>;
}

/// Blanket implementation of StateStore for Arc-wrapped stores.
impl<T: StateStore + ?Sized> StateStore for Arc<T> {
    fn load(&self) -> Result<AppState> {
        (**self).load()
    }

    fn save(&self, state: &AppState) -> Result<()> {
        (**self).save(state)
    }

    fn exists(&self) -> Result<bool> {
        (**self).exists()
    }
}

/// Test utilities for StateStore implementations.
#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::core::{LogEntry, LogKind, UndoRecord};
    use chrono::{FixedOffset, TimeZone};

    /// A small state with one entry, one surplus record and one undo record.
    pub fn sample_state() -> AppState {
        let ts = FixedOffset::east_opt(7200)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 4, 8, 15, 0)
            .unwrap();
        let entry = LogEntry::new(LogKind::Study, 12, ts);

        let mut state = AppState::new();
        state
            .logs
            .find_or_create_day(entry.date())
            .push(entry.clone());
        state.weekly_surplus.insert("2024-23".parse().unwrap(), 0);
        state.undo_stack.push(UndoRecord::new(entry.clone(), entry.date()));
        state.streak = 2;
        state.best_surplus = 14;
        state
    }

    /// Test helper to verify StateStore implementations.
    pub fn test_state_store_roundtrip<S: StateStore>(store: &S) {
        // Nothing saved yet
        assert!(!store.exists().unwrap());
        assert_eq!(store.load().unwrap(), AppState::new());

        let state = sample_state();
        store.save(&state).unwrap();
        assert!(store.exists().unwrap());
        assert_eq!(store.load().unwrap(), state);

        // Save replaces
        let mut updated = state.clone();
        updated.undo_stack.clear();
        updated.streak = 0;
        store.save(&updated).unwrap();
        assert_eq!(store.load().unwrap(), updated);
    }
}
