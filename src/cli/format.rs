//! Human-readable formatting shared by the commands.

use chrono::NaiveDate;

use crate::core::LogEntry;

/// Rule printed under every header.
pub const SEPARATOR: &str = "────────────────────────────";

/// A title followed by the separator line.
pub fn header(title: &str) -> String {
    format!("{}\n{}", title, SEPARATOR)
}

/// `[HH:MM] +N study` or `[HH:MM] -N break`, in the entry's own offset.
pub fn entry_line(entry: &LogEntry) -> String {
    format!(
        "[{}] {}{} {}",
        entry.timestamp.format("%H:%M"),
        entry.kind.sign(),
        entry.amount,
        entry.kind
    )
}

/// Short month-day label such as `Jun 3`.
pub fn short_date(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}
