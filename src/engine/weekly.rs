//! Current-week stats and per-week surplus recalculation.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::{surplus_for, Ledger, WeekTotals};
use crate::core::{week_bounds, LogKind, WeekId};

/// Snapshot of the current week's accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekStats {
    /// The current week.
    pub week: WeekId,
    /// Monday of the week.
    pub start: NaiveDate,
    /// Sunday of the week.
    pub end: NaiveDate,
    /// Study credits logged this week.
    pub study_credits: u32,
    /// Break credits spent this week.
    pub breaks_used: u32,
    /// Break credits still available this week.
    pub breaks_available: u32,
    /// Surplus earned by this week's study credits.
    pub surplus: u32,
}

impl Ledger<'_> {
    /// Sum study and break credits for `[start, end]`, skipping Sundays.
    ///
    /// Sums saturate at `u32::MAX`.
    pub(crate) fn week_totals(&self, start: NaiveDate, end: NaiveDate) -> WeekTotals {
        let mut totals = WeekTotals::default();
        for day in self.state.logs.days_in_range(start, end, Some(Weekday::Sun)) {
            totals.has_logs = true;
            for entry in &day.entries {
                match entry.kind {
                    LogKind::Study => totals.study = totals.study.saturating_add(entry.amount),
                    LogKind::Break => totals.breaks = totals.breaks.saturating_add(entry.amount),
                }
            }
        }
        totals
    }

    /// Compute this week's study credits, breaks used and breaks available.
    ///
    /// Available breaks are `break_start + stored surplus - breaks used`,
    /// floored at 0, using the surplus stored before this call. This is not a
    /// pure query: when the freshly computed surplus differs from the stored
    /// one it is written back and may raise `best_surplus`.
    pub fn current_week_stats(&mut self) -> WeekStats {
        let (start, end) = week_bounds(self.today);
        let week = WeekId::of(self.today);
        let totals = self.week_totals(start, end);

        let surplus = surplus_for(totals.study, self.config.weekly_goal);
        let stored = self.state.stored_surplus(&week);

        let available = i64::from(self.config.break_start) + i64::from(stored)
            - i64::from(totals.breaks);
        let breaks_available = u32::try_from(available.max(0)).unwrap_or(u32::MAX);

        if surplus != stored {
            tracing::debug!(%week, stored, surplus, "reconciling stored surplus");
            self.record_surplus(week, surplus);
        }

        WeekStats {
            week,
            start,
            end,
            study_credits: totals.study,
            breaks_used: totals.breaks,
            breaks_available,
            surplus,
        }
    }

    /// Recompute and store the surplus for one week.
    ///
    /// A week with no logs left has its ledger entry removed rather than set
    /// to 0, so a log followed by its undo leaves the ledger as it was.
    /// Identifiers naming a week that does not exist are ignored.
    pub fn recalculate_weekly_stats(&mut self, week: WeekId) {
        let Some((start, end)) = week.bounds() else {
            tracing::warn!(%week, "cannot resolve week id, skipping recalculation");
            return;
        };

        let totals = self.week_totals(start, end);
        if !totals.has_logs {
            if self.state.weekly_surplus.remove(&week).is_some() {
                tracing::debug!(%week, "dropped surplus for week without logs");
            }
            return;
        }

        let surplus = surplus_for(totals.study, self.config.weekly_goal);
        tracing::debug!(%week, study = totals.study, surplus, "recalculated week");
        self.record_surplus(week, surplus);
    }
}
