//! CLI commands for Grain.
//!
//! This module provides CLI commands for Grain, organized into:
//! - **Logging commands**: record (study, break), undo, reset
//! - **View commands**: history (log), week, stats
//! - **Settings commands**: goal, config, first-run init
//! - **Data commands**: backup, backups, restore

use chrono::NaiveDate;

use crate::config::Config;
use crate::core::AppState;
use crate::engine::Ledger;
use crate::error::Result;
use crate::storage::StateStore;

// Logging commands
pub mod record;
pub mod reset;
pub mod undo;

// View commands
pub mod history;
pub mod stats;
pub mod week;

// Settings commands
pub mod config_cmd;
pub mod goal;
pub mod init;

// Data commands
pub mod backup;

// Shared helpers
pub mod format;
pub mod prompt;

pub use backup::BackupCommand;
pub use config_cmd::ConfigCommand;
pub use goal::GoalCommand;
pub use history::HistoryCommand;
pub use record::RecordCommand;
pub use reset::ResetCommand;
pub use stats::StatsCommand;
pub use undo::UndoCommand;
pub use week::WeekCommand;

/// Load the state and bring the streak up to date for `today`.
pub fn load_state<S: StateStore + ?Sized>(
    store: &S,
    config: &Config,
    today: NaiveDate,
) -> Result<AppState> {
    let mut state = store.load()?;
    Ledger::new(&mut state, config, today).recalculate_overall_stats();
    Ok(state)
}
