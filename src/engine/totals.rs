//! Lifetime totals.

use serde::{Deserialize, Serialize};

use super::Ledger;
use crate::core::LogKind;

/// Sums over every stored entry, Sundays included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalStats {
    pub total_study: u64,
    pub total_breaks: u64,
    pub total_entries: usize,
}

impl Ledger<'_> {
    /// Lifetime study credits, break credits and entry count.
    pub fn total_stats(&self) -> TotalStats {
        self.state
            .logs
            .entries()
            .fold(TotalStats::default(), |mut totals, entry| {
                match entry.kind {
                    LogKind::Study => totals.total_study += u64::from(entry.amount),
                    LogKind::Break => totals.total_breaks += u64::from(entry.amount),
                }
                totals.total_entries += 1;
                totals
            })
    }
}
