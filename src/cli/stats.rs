//! Stats command for Grain.
//!
//! Displays the streak, best surplus and lifetime totals.

use chrono::{DateTime, FixedOffset, Local};
use serde::Serialize;

use crate::cli::format::header;
use crate::config::Config;
use crate::engine::{Ledger, TotalStats};
use crate::error::Result;
use crate::storage::StateStore;

/// Options for the stats command.
#[derive(Debug, Clone, Default)]
pub struct StatsOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the stats command.
#[derive(Debug, Clone, Serialize)]
pub struct StatsOutput {
    /// Consecutive qualifying weeks before this one.
    pub streak: u32,
    /// Highest weekly surplus ever recorded.
    pub best_surplus: u32,
    /// Lifetime totals.
    #[serde(flatten)]
    pub totals: TotalStats,
}

/// The stats command implementation.
pub struct StatsCommand<S: StateStore> {
    store: S,
    config: Config,
    now: DateTime<FixedOffset>,
}

impl<S: StateStore> StatsCommand<S> {
    /// Create a new stats command.
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

    /// Gather lifetime stats, saving only if the streak moved.
    pub fn run(&self) -> Result<StatsOutput> {
        let today = self.now.date_naive();
        let loaded = self.store.load()?;
        let mut state = loaded.clone();

        let mut ledger = Ledger::new(&mut state, &self.config, today);
        let streak = ledger.recalculate_overall_stats();
        let totals = ledger.total_stats();
        let best_surplus = ledger.state().best_surplus;

        if state != loaded {
            self.store.save(&state)?;
        }

        Ok(StatsOutput {
            streak,
            best_surplus,
            totals,
        })
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &StatsOutput, options: &StatsOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &StatsOutput) -> String {
        [
            header("📈 Your Stats"),
            format!("🔁 Streak:         {} weeks", output.streak),
            format!("🏆 Best Surplus:   +{}", output.best_surplus),
            format!("📚 Total Study:    {} credits", output.totals.total_study),
            format!("🍵 Total Breaks:   {} credits", output.totals.total_breaks),
            format!("🧾 Total Entries:  {}", output.totals.total_entries),
        ]
        .join("\n")
    }
}
