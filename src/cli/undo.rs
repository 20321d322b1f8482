//! Undo command for Grain.
//!
//! Removes the most recently logged entry.

use chrono::{DateTime, FixedOffset, Local};
use serde::Serialize;

use crate::cli::format::entry_line;
use crate::cli::load_state;
use crate::config::Config;
use crate::core::LogEntry;
use crate::engine::Ledger;
use crate::error::Result;
use crate::storage::StateStore;

/// Options for the undo command.
#[derive(Debug, Clone, Default)]
pub struct UndoOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the undo command.
#[derive(Debug, Clone, Serialize)]
pub struct UndoOutput {
    /// The entry that was removed.
    pub undone: LogEntry,
    /// Undo records left on the stack.
    pub remaining: usize,
}

/// The undo command implementation.
pub struct UndoCommand<S: StateStore> {
    store: S,
    config: Config,
    now: DateTime<FixedOffset>,
}

impl<S: StateStore> UndoCommand<S> {
    /// Create a new undo command.
    pub fn new(store: S, config: Config) -> Self {
        Self {
            store,
            config,
            now: Local::now().fixed_offset(),
        }
    }

    /// Use a fixed clock instead of the wall clock.
    pub fn at(mut self, now: DateTime<FixedOffset>) -> Self {
        self.now = now;
        self
    }

    /// Undo the last log action and persist the state.
    pub fn run(&self) -> Result<UndoOutput> {
        let today = self.now.date_naive();
        let mut state = load_state(&self.store, &self.config, today)?;

        let mut ledger = Ledger::new(&mut state, &self.config, today);
        let undone = ledger.undo_last_action()?;
        let remaining = ledger.state().undo_stack.len();

        self.store.save(&state)?;
        Ok(UndoOutput { undone, remaining })
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &UndoOutput, options: &UndoOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            format!(
                "🔙 Undid log: {}\nRemaining undo steps: {}",
                entry_line(&output.undone),
                output.remaining
            )
        }
    }
}
