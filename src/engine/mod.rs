//! Weekly accounting engine.
//!
//! The engine turns the day-partitioned log into week-scoped totals,
//! surplus bonuses, available break credits, the weekly streak and lifetime
//! totals, and applies the log, undo and reset mutations. It performs no I/O:
//! callers load an [`AppState`], borrow it into a [`Ledger`] together with
//! the [`Config`] and the current date, then persist the result.

mod mutation;
mod streak;
mod totals;
mod weekly;

use chrono::NaiveDate;

use crate::config::Config;
use crate::core::{AppState, WeekId};

pub use mutation::ResetSummary;
pub use streak::STREAK_LOOKBACK_YEARS;
pub use totals::TotalStats;
pub use weekly::WeekStats;

/// Surplus earned for a week: two break credits per study credit above goal.
///
/// The live query and the recalculation path historically disagreed on `>`
/// versus `>=` at the threshold. Both yield 0 when `study == goal`, so a
/// single strict comparison serves both.
pub fn surplus_for(study_credits: u32, weekly_goal: u32) -> u32 {
    if study_credits > weekly_goal {
        (study_credits - weekly_goal).saturating_mul(2)
    } else {
        0
    }
}

/// Accounting view over the application state.
///
/// All engine queries and mutations go through this struct. `today` fixes
/// which week counts as the current one.
#[derive(Debug)]
pub struct Ledger<'a> {
    /// The state being read and mutated.
    state: &'a mut AppState,
    /// Weekly goal and break allowance.
    config: &'a Config,
    /// Local date treated as "now".
    today: NaiveDate,
}

impl<'a> Ledger<'a> {
    /// Create a new ledger.
    pub fn new(state: &'a mut AppState, config: &'a Config, today: NaiveDate) -> Self {
        Self {
            state,
            config,
            today,
        }
    }

    /// The underlying state.
    pub fn state(&self) -> &AppState {
        self.state
    }

    /// The configuration in effect.
    pub fn config(&self) -> &Config {
        self.config
    }

    /// The date treated as today.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// The week containing `today`.
    pub fn current_week(&self) -> WeekId {
        WeekId::of(self.today)
    }

    /// Store a week's surplus and raise the lifetime best if exceeded.
    fn record_surplus(&mut self, week: WeekId, surplus: u32) {
        self.state.weekly_surplus.insert(week, surplus);
        if surplus > self.state.best_surplus {
            tracing::info!(%week, surplus, previous = self.state.best_surplus, "new best surplus");
            self.state.best_surplus = surplus;
        }
    }
}

/// Week-scoped sums over non-Sunday buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct WeekTotals {
    /// Study credits logged.
    pub study: u32,
    /// Break credits spent.
    pub breaks: u32,
    /// Whether any non-Sunday bucket falls in the week.
    pub has_logs: bool,
}
