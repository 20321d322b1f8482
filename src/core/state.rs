//! Persisted application state.
//!
//! `AppState` is the aggregate root loaded from `data.json` at process start
//! and written back after each mutating command. The configuration is kept
//! outside of it and borrowed next to it by the engine.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::log::{DayLog, LogEntry};
use crate::core::week::WeekId;
use crate::util::null_as_default;

/// Everything needed to reverse one log action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoRecord {
    /// The entry that was added.
    pub log: LogEntry,
    /// Date of the bucket the entry was filed under.
    pub day: NaiveDate,
}

impl UndoRecord {
    /// Create a new undo record.
    pub fn new(log: LogEntry, day: NaiveDate) -> Self {
        Self { log, day }
    }
}

/// Aggregate root of everything Grain persists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    /// Day buckets, ascending by date.
    #[serde(default, deserialize_with = "null_as_default")]
    pub logs: DayLog,
    /// Surplus earned per week. Derivable from `logs` and the config; kept as
    /// a history ledger.
    #[serde(default, deserialize_with = "null_as_default")]
    pub weekly_surplus: BTreeMap<WeekId, u32>,
    /// Consecutive qualifying weeks before the current one.
    #[serde(default)]
    pub streak: u32,
    /// Highest weekly surplus ever recorded.
    #[serde(default)]
    pub best_surplus: u32,
    /// Most recent log action last.
    #[serde(default, deserialize_with = "null_as_default")]
    pub undo_stack: Vec<UndoRecord>,
}

impl AppState {
    /// Create a fresh, empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored surplus for `week`, 0 when none has been recorded.
    pub fn stored_surplus(&self, week: &WeekId) -> u32 {
        self.weekly_surplus.get(week).copied().unwrap_or(0)
    }
}
