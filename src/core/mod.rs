//! Core types for Grain.
//!
//! This module contains week arithmetic, the day-partitioned log store and
//! the persisted application state.

pub mod log;
pub mod state;
pub mod week;

pub use log::{DayBucket, DayLog, LogEntry, LogKind};
pub use state::{AppState, UndoRecord};
pub use week::{week_bounds, WeekId};
