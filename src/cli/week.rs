//! Week command for Grain.
//!
//! Shows the current week's study progress, available breaks, surplus and
//! streak.

use chrono::{DateTime, FixedOffset, Local};
use serde::Serialize;

use crate::cli::format::{header, short_date};
use crate::config::Config;
use crate::engine::{Ledger, WeekStats};
use crate::error::Result;
use crate::storage::StateStore;

/// Options for the week command.
#[derive(Debug, Clone, Default)]
pub struct WeekOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the week command.
#[derive(Debug, Clone, Serialize)]
pub struct WeekOutput {
    /// Current week figures.
    #[serde(flatten)]
    pub stats: WeekStats,
    /// Weekly study goal in effect.
    pub weekly_goal: u32,
    /// Weekly break allowance in effect.
    pub break_start: u32,
    /// Consecutive qualifying weeks before this one.
    pub streak: u32,
}

/// The week command implementation.
pub struct WeekCommand<S: StateStore> {
    store: S,
    config: Config,
    now: DateTime<FixedOffset>,
}

impl<S: StateStore> WeekCommand<S> {
    /// Create a new week command.
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

    /// Compute the overview. Saves only when the stored surplus or streak
    /// had to be brought up to date.
    pub fn run(&self) -> Result<WeekOutput> {
        let today = self.now.date_naive();
        let loaded = self.store.load()?;
        let mut state = loaded.clone();

        let mut ledger = Ledger::new(&mut state, &self.config, today);
        let stats = ledger.current_week_stats();
        let streak = ledger.recalculate_overall_stats();

        if state != loaded {
            tracing::debug!("week overview updated derived stats, saving");
            self.store.save(&state)?;
        }

        Ok(WeekOutput {
            stats,
            weekly_goal: self.config.weekly_goal,
            break_start: self.config.break_start,
            streak,
        })
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &WeekOutput, options: &WeekOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &WeekOutput) -> String {
        let stats = &output.stats;
        [
            header(&format!("📊 Week of {}", short_date(stats.start))),
            format!(
                "🧠 Study     ▸ {} / {}",
                stats.study_credits, output.weekly_goal
            ),
            format!(
                "💤 Breaks    ▸ {} / {}",
                stats.breaks_available, output.break_start
            ),
            format!("✨ Surplus   ▸ {}", stats.surplus),
            format!("🔥 Streak    ▸ {} weeks", output.streak),
        ]
        .join("\n")
    }
}
