//! Log entries and the day-partitioned log store.
//!
//! Every credit transaction is a [`LogEntry`]. Entries are grouped into one
//! [`DayBucket`] per calendar date, and the buckets live in a [`DayLog`]
//! sorted by date.

use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Weekday};
use serde::{Deserialize, Serialize, Serializer};

use crate::util::null_as_default;

/// Kind of credit transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    /// Focused work, earns study credits.
    Study,
    /// A break, spends break credits.
    Break,
}

impl LogKind {
    /// Name used on disk and in output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Study => "study",
            Self::Break => "break",
        }
    }

    /// Sign shown in front of the amount: study earns, breaks spend.
    pub fn sign(&self) -> char {
        match self {
            Self::Study => '+',
            Self::Break => '-',
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One credit transaction.
///
/// Entries have no id of their own. Two entries are equal when their kind,
/// amount and instant match, which is how undo finds its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Study or break.
    #[serde(rename = "type")]
    pub kind: LogKind,
    /// Local wall-clock time with its UTC offset.
    pub timestamp: DateTime<FixedOffset>,
    /// Credits earned or spent, always positive.
    pub amount: u32,
}

impl LogEntry {
    /// Create a new entry.
    pub fn new(kind: LogKind, amount: u32, timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            kind,
            timestamp,
            amount,
        }
    }

    /// Calendar date of the entry in its own local offset.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// All entries logged on one calendar date, sorted by timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    /// The calendar date (`YYYY-MM-DD` on disk).
    pub date: NaiveDate,
    /// Entries in ascending timestamp order.
    #[serde(rename = "logs", default, deserialize_with = "null_as_default")]
    pub entries: Vec<LogEntry>,
}

impl DayBucket {
    /// Create an empty bucket for `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            entries: Vec::new(),
        }
    }

    /// Append an entry, keeping timestamp order.
    ///
    /// The sort is stable: entries with identical timestamps keep their
    /// insertion order.
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
        self.entries.sort_by_key(|e| e.timestamp);
    }

    /// Remove the first entry equal to `target`, returning it.
    pub fn remove_first(&mut self, target: &LogEntry) -> Option<LogEntry> {
        let index = self.entries.iter().position(|e| e == target)?;
        Some(self.entries.remove(index))
    }

    /// Whether the bucket holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Weekday of the bucket's date.
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }
}

/// Ordered collection of day buckets, ascending by date, one per date.
///
/// Empty buckets are never written out: a bucket only reaches disk once it
/// holds an entry. Loading restores the ordering, so hand-edited files with
/// unsorted or repeated dates are merged into one bucket per date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<DayBucket>")]
pub struct DayLog {
    days: Vec<DayBucket>,
}

impl From<Vec<DayBucket>> for DayLog {
    fn from(mut buckets: Vec<DayBucket>) -> Self {
        buckets.sort_by_key(|day| day.date);

        let mut days: Vec<DayBucket> = Vec::with_capacity(buckets.len());
        for bucket in buckets {
            match days.last_mut() {
                Some(last) if last.date == bucket.date => {
                    last.entries.extend(bucket.entries);
                    last.entries.sort_by_key(|e| e.timestamp);
                }
                _ => {
                    let mut bucket = bucket;
                    bucket.entries.sort_by_key(|e| e.timestamp);
                    days.push(bucket);
                }
            }
        }
        Self { days }
    }
}

impl Serialize for DayLog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.days.iter().filter(|day| !day.is_empty()))
    }
}

impl DayLog {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether the store has no buckets.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// All buckets in store order.
    pub fn days(&self) -> &[DayBucket] {
        &self.days
    }

    /// Every entry in every bucket.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> + '_ {
        self.days.iter().flat_map(|day| day.entries.iter())
    }

    /// Exact-match lookup by date.
    pub fn find_day(&self, date: NaiveDate) -> Option<&DayBucket> {
        self.days.iter().find(|day| day.date == date)
    }

    /// Mutable exact-match lookup by date.
    pub fn find_day_mut(&mut self, date: NaiveDate) -> Option<&mut DayBucket> {
        self.days.iter_mut().find(|day| day.date == date)
    }

    /// Return the bucket for `date`, inserting an empty one at its sorted
    /// position if none exists.
    pub fn find_or_create_day(&mut self, date: NaiveDate) -> &mut DayBucket {
        let index = match self.days.iter().position(|day| day.date == date) {
            Some(index) => index,
            None => {
                let index = self.days.partition_point(|day| day.date <= date);
                self.days.insert(index, DayBucket::new(date));
                index
            }
        };
        &mut self.days[index]
    }

    /// Delete the bucket for `date`. No-op if absent.
    pub fn remove_day(&mut self, date: NaiveDate) {
        self.days.retain(|day| day.date != date);
    }

    /// Delete every bucket whose date lies in `[start, end]`, returning them.
    pub fn remove_range(&mut self, start: NaiveDate, end: NaiveDate) -> Vec<DayBucket> {
        let (removed, kept): (Vec<DayBucket>, Vec<DayBucket>) = std::mem::take(&mut self.days)
            .into_iter()
            .partition(|day| day.date >= start && day.date <= end);
        self.days = kept;
        removed
    }

    /// Buckets dated within `[start, end]`, optionally skipping one weekday.
    pub fn days_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        exclude: Option<Weekday>,
    ) -> impl Iterator<Item = &DayBucket> + '_ {
        self.days
            .iter()
            .filter(move |day| day.date >= start && day.date <= end)
            .filter(move |day| exclude != Some(day.weekday()))
    }

    /// Entries whose bucket date and own timestamp date both lie within
    /// `[start, end]`, optionally skipping buckets on one weekday.
    pub fn range_filter(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        exclude: Option<Weekday>,
    ) -> impl Iterator<Item = &LogEntry> + '_ {
        self.days_in_range(start, end, exclude)
            .flat_map(|day| day.entries.iter())
            .filter(move |entry| {
                let date = entry.date();
                date >= start && date <= end
            })
    }
}
