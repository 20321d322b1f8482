//! Grain - weekly study and break credit tracker
//!
//! Grain logs study credits against a weekly goal and lets break credits be
//! spent from a weekly allowance topped up by any surplus. It tracks the
//! streak of weeks that met the goal, and supports undo, week reset and
//! backups of the local data file.

pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod storage;
pub mod util;

pub use config::Config;
pub use core::{AppState, DayBucket, DayLog, LogEntry, LogKind, UndoRecord, WeekId};
pub use engine::{surplus_for, Ledger, ResetSummary, TotalStats, WeekStats};
pub use error::{GrainError, Result};
pub use storage::{FileStateStore, MemoryStateStore, StateStore};

// CLI commands
pub use cli::{
    BackupCommand, ConfigCommand, GoalCommand, HistoryCommand, RecordCommand, ResetCommand,
    StatsCommand, UndoCommand, WeekCommand,
};
