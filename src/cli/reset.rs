//! Reset command for Grain.
//!
//! Wipes the current week's entries and the undo history after the user
//! types the confirmation phrase.

use chrono::{DateTime, FixedOffset, Local};
use serde::Serialize;

use crate::cli::load_state;
use crate::config::Config;
use crate::engine::{Ledger, ResetSummary};
use crate::error::Result;
use crate::storage::StateStore;

/// Options for the reset command.
#[derive(Debug, Clone, Default)]
pub struct ResetOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the reset command.
#[derive(Debug, Clone, Serialize)]
pub struct ResetOutput {
    /// Whether the week was reset.
    pub reset: bool,
    /// What was removed, when the reset went ahead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ResetSummary>,
}

/// The reset command implementation.
pub struct ResetCommand<S: StateStore> {
    store: S,
    config: Config,
    now: DateTime<FixedOffset>,
}

impl<S: StateStore> ResetCommand<S> {
    /// Create a new reset command.
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

    /// Reset the current week if `confirmed`, otherwise do nothing.
    pub fn run(&self, confirmed: bool) -> Result<ResetOutput> {
        if !confirmed {
            return Ok(ResetOutput {
                reset: false,
                summary: None,
            });
        }

        let today = self.now.date_naive();
        let mut state = load_state(&self.store, &self.config, today)?;
        let summary = Ledger::new(&mut state, &self.config, today).reset_week_data();
        self.store.save(&state)?;

        Ok(ResetOutput {
            reset: true,
            summary: Some(summary),
        })
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ResetOutput, options: &ResetOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else if output.reset {
            "🧹 Current week data has been reset.".to_string()
        } else {
            "Reset cancelled.".to_string()
        }
    }
}
