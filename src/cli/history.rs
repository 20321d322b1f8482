//! Log command for Grain.
//!
//! Lists entries from a start date through today, with study and break
//! totals. Without `--since` only today is shown.

use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use serde::Serialize;

use crate::cli::format::{entry_line, header, short_date};
use crate::cli::load_state;
use crate::config::Config;
use crate::core::{week_bounds, LogEntry, LogKind};
use crate::error::{GrainError, Result};
use crate::storage::StateStore;

/// Options for the log command.
#[derive(Debug, Clone, Default)]
pub struct HistoryOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Inclusive date range selected by `--since`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRange {
    /// First date shown.
    pub start: NaiveDate,
    /// Last date shown.
    pub end: NaiveDate,
    /// Header label, e.g. `Jun 3` or `Week of Jun 3`.
    pub label: String,
}

/// Resolve a `--since` value against `today`.
///
/// Accepts `today`, `yesterday`, `monday` or a `YYYY-MM-DD` date, case
/// insensitively. `yesterday` covers a single day; `monday` and explicit
/// dates run through today.
pub fn parse_since(since: Option<&str>, today: NaiveDate) -> Result<LogRange> {
    let value = since.map(|s| s.trim().to_lowercase());
    let range = match value.as_deref() {
        None | Some("") | Some("today") => LogRange {
            start: today,
            end: today,
            label: short_date(today),
        },
        Some("yesterday") => {
            let yesterday = today.pred_opt().ok_or_else(|| {
                GrainError::validation("cannot go back a day from the earliest date")
            })?;
            LogRange {
                start: yesterday,
                end: yesterday,
                label: short_date(yesterday),
            }
        }
        Some("monday") => {
            let (monday, _) = week_bounds(today);
            LogRange {
                start: monday,
                end: today,
                label: format!("Week of {}", short_date(monday)),
            }
        }
        Some(other) => {
            let start = NaiveDate::parse_from_str(other, "%Y-%m-%d").map_err(|_| {
                GrainError::validation(format!(
                    "invalid --since value: '{}'. Use 'today', 'yesterday', 'monday', or 'YYYY-MM-DD'",
                    other
                ))
            })?;
            LogRange {
                start,
                end: today,
                label: format!("Since {}", short_date(start)),
            }
        }
    };
    Ok(range)
}

/// Output format for the log command.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryOutput {
    /// The range that was listed.
    pub range: LogRange,
    /// Matching entries in date order.
    pub entries: Vec<LogEntry>,
    /// Study credits in range.
    pub total_study: u64,
    /// Break credits in range.
    pub total_breaks: u64,
}

/// The log command implementation.
pub struct HistoryCommand<S: StateStore> {
    store: S,
    config: Config,
    now: DateTime<FixedOffset>,
}

impl<S: StateStore> HistoryCommand<S> {
    /// Create a new log command.
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

    /// List entries in the `--since` range. Read-only.
    pub fn run(&self, since: Option<&str>) -> Result<HistoryOutput> {
        let today = self.now.date_naive();
        let range = parse_since(since, today)?;
        let state = load_state(&self.store, &self.config, today)?;

        let entries: Vec<LogEntry> = state
            .logs
            .range_filter(range.start, range.end, None)
            .cloned()
            .collect();

        let (total_study, total_breaks) =
            entries
                .iter()
                .fold((0u64, 0u64), |(study, breaks), entry| match entry.kind {
                    LogKind::Study => (study + u64::from(entry.amount), breaks),
                    LogKind::Break => (study, breaks + u64::from(entry.amount)),
                });

        Ok(HistoryOutput {
            range,
            entries,
            total_study,
            total_breaks,
        })
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &HistoryOutput, options: &HistoryOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &HistoryOutput) -> String {
        let mut lines = vec![header(&format!("🗓️  Log {}", output.range.label))];

        if output.entries.is_empty() {
            lines.push("No matching entries found.".to_string());
            return lines.join("\n");
        }

        lines.extend(output.entries.iter().map(entry_line));
        lines.push(String::new());
        lines.push(format!(
            "Total ▸ 🧠 {} study   💤 {} break",
            output.total_study, output.total_breaks
        ));
        lines.join("\n")
    }
}
