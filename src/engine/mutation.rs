//! Log, undo and week reset.

use chrono::{DateTime, Datelike, FixedOffset, Weekday};
use serde::{Deserialize, Serialize};

use super::Ledger;
use crate::core::{week_bounds, LogEntry, LogKind, UndoRecord, WeekId};
use crate::error::{GrainError, Result};

/// What a week reset removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetSummary {
    /// Day buckets deleted from the current week.
    pub days_removed: usize,
    /// Entries contained in those buckets.
    pub entries_removed: usize,
    /// Undo records discarded.
    pub undo_cleared: usize,
}

impl Ledger<'_> {
    /// Record a study or break entry.
    ///
    /// Files the entry under its timestamp's local date, pushes an undo
    /// record and recalculates that week's surplus. Sundays are rejected. The
    /// break allowance is not checked here; callers that want to refuse
    /// overdrawn breaks consult [`Ledger::current_week_stats`] first.
    pub fn add_log(
        &mut self,
        kind: LogKind,
        amount: u32,
        timestamp: DateTime<FixedOffset>,
    ) -> Result<LogEntry> {
        if timestamp.weekday() == Weekday::Sun {
            return Err(GrainError::validation("logging is disabled on Sundays"));
        }
        if amount == 0 {
            return Err(GrainError::validation("log amount must be positive"));
        }

        let entry = LogEntry::new(kind, amount, timestamp);
        let date = entry.date();
        self.state.logs.find_or_create_day(date).push(entry.clone());
        self.state
            .undo_stack
            .push(UndoRecord::new(entry.clone(), date));

        tracing::info!(%kind, amount, %date, "logged entry");
        self.recalculate_weekly_stats(WeekId::of(date));
        Ok(entry)
    }

    /// Reverse the most recent log action.
    ///
    /// The undo record is only consumed once its entry has been removed, so a
    /// failure leaves the state untouched.
    pub fn undo_last_action(&mut self) -> Result<LogEntry> {
        let record = self
            .state
            .undo_stack
            .last()
            .cloned()
            .ok_or(GrainError::NothingToUndo)?;

        let bucket = self.state.logs.find_day_mut(record.day).ok_or_else(|| {
            GrainError::inconsistent(format!("cannot find day log '{}' for undo", record.day))
        })?;
        let removed = bucket.remove_first(&record.log).ok_or_else(|| {
            GrainError::inconsistent(format!(
                "cannot find log entry to undo in day '{}'",
                record.day
            ))
        })?;
        if bucket.is_empty() {
            self.state.logs.remove_day(record.day);
        }
        self.state.undo_stack.pop();

        tracing::info!(kind = %removed.kind, amount = removed.amount, day = %record.day, "undid entry");
        self.recalculate_weekly_stats(WeekId::of(record.day));
        self.recalculate_overall_stats();
        Ok(removed)
    }

    /// Delete every bucket of the current week, its surplus entry and the
    /// whole undo history. Other weeks are untouched.
    pub fn reset_week_data(&mut self) -> ResetSummary {
        let (start, end) = week_bounds(self.today);
        let removed = self.state.logs.remove_range(start, end);
        let entries_removed = removed.iter().map(|day| day.entries.len()).sum();

        self.state.weekly_surplus.remove(&self.current_week());
        let undo_cleared = self.state.undo_stack.len();
        self.state.undo_stack.clear();
        self.recalculate_overall_stats();

        let summary = ResetSummary {
            days_removed: removed.len(),
            entries_removed,
            undo_cleared,
        };
        tracing::info!(
            week = %self.current_week(),
            days = summary.days_removed,
            entries = summary.entries_removed,
            "reset current week"
        );
        summary
    }
}
