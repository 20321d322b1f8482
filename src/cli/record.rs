//! Study and break logging commands.
//!
//! `grain [amount]`, `grain s [amount]` and `grain b [amount]` all land here.
//! Breaks are refused up front when the week's allowance is too small; the
//! engine itself never enforces the cap.

use chrono::{DateTime, FixedOffset, Local};
use serde::Serialize;

use crate::cli::load_state;
use crate::config::Config;
use crate::core::{LogEntry, LogKind};
use crate::engine::{Ledger, WeekStats};
use crate::error::{GrainError, Result};
use crate::storage::StateStore;

/// Options for the record command.
#[derive(Debug, Clone, Default)]
pub struct RecordOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the record command.
#[derive(Debug, Clone, Serialize)]
pub struct RecordOutput {
    /// The entry that was logged.
    pub entry: LogEntry,
    /// Current week after logging.
    pub week: WeekStats,
}

/// The record command implementation.
pub struct RecordCommand<S: StateStore> {
    store: S,
    config: Config,
    now: DateTime<FixedOffset>,
}

impl<S: StateStore> RecordCommand<S> {
    /// Create a new record command stamped with the current local time.
    pub fn new(store: S, config: Config) -> Self {
        Self {
            store,
            config,
            now: Local::now().fixed_offset(),
        }
    }

    /// Use a fixed timestamp instead of the wall clock.
    pub fn at(mut self, now: DateTime<FixedOffset>) -> Self {
        self.now = now;
        self
    }

    /// Log `amount` credits of `kind` and persist the state.
    pub fn run(&self, kind: LogKind, amount: u32) -> Result<RecordOutput> {
        let today = self.now.date_naive();
        let mut state = load_state(&self.store, &self.config, today)?;
        let mut ledger = Ledger::new(&mut state, &self.config, today);

        if kind == LogKind::Break {
            let available = ledger.current_week_stats().breaks_available;
            if amount > available {
                return Err(GrainError::InsufficientBreaks {
                    needed: amount,
                    available,
                });
            }
        }

        let entry = ledger.add_log(kind, amount, self.now)?;
        let week = ledger.current_week_stats();
        self.store.save(&state)?;

        Ok(RecordOutput { entry, week })
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &RecordOutput, options: &RecordOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &RecordOutput) -> String {
        match output.entry.kind {
            LogKind::Study => format!(
                "✨ +{} study credits logged. Keep it rolling!",
                output.entry.amount
            ),
            LogKind::Break => format!(
                "🍵 -{} break credit logged. Breathe easy.",
                output.entry.amount
            ),
        }
    }
}
