//! Weekly streak recalculation.

use chrono::{Days, Months};

use super::Ledger;
use crate::core::week_bounds;

/// How far back the streak walk looks before giving up.
pub const STREAK_LOOKBACK_YEARS: u32 = 5;

impl Ledger<'_> {
    /// Recompute the streak: consecutive weeks before the current one that
    /// have logs and reached the weekly goal.
    ///
    /// The current week never counts. The walk stops at the first week with
    /// no logs or below goal, or once it passes the lookback window.
    pub fn recalculate_overall_stats(&mut self) -> u32 {
        let streak = self.count_streak();
        if streak != self.state.streak {
            tracing::debug!(previous = self.state.streak, streak, "streak changed");
        }
        self.state.streak = streak;
        streak
    }

    fn count_streak(&self) -> u32 {
        if self.state.logs.is_empty() {
            return 0;
        }

        let cutoff = self
            .today
            .checked_sub_months(Months::new(12 * STREAK_LOOKBACK_YEARS));
        let mut cursor = self.today.checked_sub_days(Days::new(7));
        let mut streak = 0;

        while let Some(date) = cursor {
            if cutoff.is_some_and(|limit| date < limit) {
                break;
            }

            let (start, end) = week_bounds(date);
            let totals = self.week_totals(start, end);
            if !totals.has_logs || totals.study < self.config.weekly_goal {
                break;
            }

            streak += 1;
            cursor = date.checked_sub_days(Days::new(7));
        }

        streak
    }
}
