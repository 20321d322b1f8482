//! ISO-8601 week arithmetic.
//!
//! Weeks run Monday through Sunday. A week is identified by its ISO
//! week-numbering year and week number (`"2024-07"`), which is the key of the
//! weekly surplus ledger. Identifiers can be resolved back to a date inside
//! the week they name.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{GrainError, Result};

/// Whole-week steps allowed when correcting the reverse-mapping estimate.
///
/// The first-Monday estimate is off by at most one week for every valid
/// identifier, so running out of steps means the week does not exist.
const MAX_WEEK_ADJUSTMENTS: usize = 2;

/// Return the Monday and Sunday (both inclusive) of the week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = u64::from(date.weekday().num_days_from_monday());
    let start = date - Days::new(offset);
    let end = start + Days::new(6);
    (start, end)
}

/// Identifier of an ISO-8601 week, formatted as `YYYY-WW`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekId {
    year: i32,
    week: u32,
}

impl WeekId {
    /// Build an identifier from its parts.
    ///
    /// Only the range `1..=53` is checked here; whether a 53rd week exists in
    /// `year` is answered by [`WeekId::representative_date`].
    pub fn new(year: i32, week: u32) -> Result<Self> {
        if !(1..=53).contains(&week) {
            return Err(GrainError::validation(format!(
                "invalid ISO week number {} (expected 1-53)",
                week
            )));
        }
        Ok(Self { year, week })
    }

    /// The identifier of the week containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// ISO week-numbering year (may differ from the calendar year near January 1).
    pub fn year(&self) -> i32 {
        self.year
    }

    /// ISO week number, 1 to 53.
    pub fn week(&self) -> u32 {
        self.week
    }

    /// Resolve the identifier to a date inside the week it names.
    ///
    /// Starts at the first Monday of the calendar year, advances `week - 1`
    /// weeks, then steps one week at a time toward the target while the
    /// estimate's own ISO week disagrees. Returns `None` when the week does
    /// not exist (week 53 of a 52-week year).
    pub fn representative_date(&self) -> Option<NaiveDate> {
        let jan1 = NaiveDate::from_ymd_opt(self.year, 1, 1)?;
        let to_monday = (7 - jan1.weekday().num_days_from_monday()) % 7;
        let first_monday = jan1.checked_add_days(Days::new(u64::from(to_monday)))?;
        let mut date =
            first_monday.checked_add_days(Days::new(u64::from(self.week - 1) * 7))?;

        for _ in 0..=MAX_WEEK_ADJUSTMENTS {
            date = match WeekId::of(date).cmp(self) {
                Ordering::Equal => return Some(date),
                Ordering::Greater => date.checked_sub_days(Days::new(7))?,
                Ordering::Less => date.checked_add_days(Days::new(7))?,
            };
        }
        None
    }

    /// Monday and Sunday of the week, if it exists.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.representative_date().map(week_bounds)
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.week)
    }
}

impl FromStr for WeekId {
    type Err = GrainError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || GrainError::validation(format!("invalid week id '{}'", s));
        let (year, week) = s.rsplit_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let week = week.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, week)
    }
}

impl TryFrom<String> for WeekId {
    type Error = GrainError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<WeekId> for String {
    fn from(id: WeekId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_bounds_midweek() {
        // Thursday
        let (start, end) = week_bounds(date(2024, 6, 6));
        assert_eq!(start, date(2024, 6, 3));
        assert_eq!(end, date(2024, 6, 9));
    }

    #[test]
    fn test_week_bounds_monday_and_sunday() {
        assert_eq!(week_bounds(date(2024, 6, 3)).0, date(2024, 6, 3));
        // Sunday belongs to the week that started the previous Monday
        let (start, end) = week_bounds(date(2024, 6, 9));
        assert_eq!(start, date(2024, 6, 3));
        assert_eq!(end, date(2024, 6, 9));
    }

    #[test]
    fn test_week_bounds_across_year_boundary() {
        let (start, end) = week_bounds(date(2025, 1, 1));
        assert_eq!(start, date(2024, 12, 30));
        assert_eq!(end, date(2025, 1, 5));
    }

    #[test]
    fn test_week_id_format() {
        assert_eq!(WeekId::of(date(2024, 2, 14)).to_string(), "2024-07");
        assert_eq!(WeekId::of(date(2024, 12, 30)).to_string(), "2025-01");
        assert_eq!(WeekId::of(date(2021, 1, 3)).to_string(), "2020-53");
    }

    #[test]
    fn test_week_id_parse() {
        let id: WeekId = "2020-53".parse().unwrap();
        assert_eq!(id.year(), 2020);
        assert_eq!(id.week(), 53);

        assert!("2020".parse::<WeekId>().is_err());
        assert!("2020-xx".parse::<WeekId>().is_err());
        assert!("2020-00".parse::<WeekId>().is_err());
        assert!("2020-54".parse::<WeekId>().is_err());
    }

    #[test]
    fn test_week_id_orders_chronologically() {
        let a: WeekId = "2024-52".parse().unwrap();
        let b: WeekId = "2025-01".parse().unwrap();
        let c: WeekId = "2025-10".parse().unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_representative_date_when_first_monday_is_week_two() {
        // 2026-01-01 is a Thursday, so ISO week 1 starts 2025-12-29
        let id: WeekId = "2026-01".parse().unwrap();
        let d = id.representative_date().unwrap();
        assert_eq!(WeekId::of(d), id);
        assert_eq!(week_bounds(d).0, date(2025, 12, 29));
    }

    #[test]
    fn test_representative_date_week_53() {
        let id: WeekId = "2020-53".parse().unwrap();
        let d = id.representative_date().unwrap();
        assert_eq!(week_bounds(d), (date(2020, 12, 28), date(2021, 1, 3)));
    }

    #[test]
    fn test_representative_date_nonexistent_week() {
        // 2021 has 52 ISO weeks
        let id: WeekId = "2021-53".parse().unwrap();
        assert_eq!(id.representative_date(), None);
        assert_eq!(id.bounds(), None);
    }

    #[test]
    fn test_representative_date_is_fixed_point_2000_through_2099() {
        let mut d = date(2000, 1, 1);
        let last = date(2099, 12, 31);
        while d <= last {
            let id = WeekId::of(d);
            let back = id
                .representative_date()
                .unwrap_or_else(|| panic!("no representative date for {} ({})", id, d));
            assert_eq!(WeekId::of(back), id, "round trip failed for {}", d);
            d = d.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_representative_date_matches_chrono_iso_calendar() {
        for year in 2000..2100 {
            for week in 1..=53 {
                let id = WeekId::new(year, week).unwrap();
                let expected = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon);
                assert_eq!(
                    id.representative_date().map(|d| week_bounds(d).0),
                    expected,
                    "mismatch for {}",
                    id
                );
            }
        }
    }

    #[test]
    fn test_week_id_serde_as_string() {
        let id: WeekId = "2024-07".parse().unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"2024-07\"");
        let back: WeekId = serde_json::from_str("\"2024-07\"").unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<WeekId>("\"bogus\"").is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Property: the week id of any date resolves back to a date in the same week
            #[test]
            fn prop_week_id_reverse_is_exact(days in 0i64..73_000) {
                let d = date(1900, 1, 1) + chrono::Duration::days(days);
                let id = WeekId::of(d);
                let back = id.representative_date();
                prop_assert!(back.is_some());
                prop_assert_eq!(WeekId::of(back.unwrap()), id);
            }

            // Property: bounds always span Monday to Sunday and contain the date
            #[test]
            fn prop_week_bounds_contain_date(days in 0i64..73_000) {
                let d = date(1900, 1, 1) + chrono::Duration::days(days);
                let (start, end) = week_bounds(d);
                prop_assert_eq!(start.weekday(), chrono::Weekday::Mon);
                prop_assert_eq!(end.weekday(), chrono::Weekday::Sun);
                prop_assert!(start <= d && d <= end);
            }
        }
    }
}
