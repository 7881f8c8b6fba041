// ABOUTME: Gap detection over a user's logged dates
// ABOUTME: Lazy iterator of missing calendar days between first and last record

//! Gap detection.
//!
//! A gap is a calendar date inside a user's active logging span (first to
//! last logged date, both inclusive) with no record. The detector walks the
//! span lazily so a multi-year window costs nothing until consumed, and
//! yields missing dates in ascending order. Spans with zero or one logged
//! date have no interior and produce nothing.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Lazy ascending iterator over the missing dates of one span
pub struct MissingDates {
    cursor: Option<NaiveDate>,
    last: NaiveDate,
    logged: BTreeSet<NaiveDate>,
}

impl MissingDates {
    /// Build a detector from the distinct dates a user has logged
    ///
    /// Duplicate input dates are tolerated; the span is `[min, max]`.
    pub fn new<I>(dates: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let logged: BTreeSet<NaiveDate> = dates.into_iter().collect();
        let first = logged.iter().next().copied();
        let last = logged.iter().next_back().copied();
        match (first, last) {
            (Some(first), Some(last)) if first < last => Self {
                cursor: Some(first),
                last,
                logged,
            },
            // Zero or one record: no interior to scan.
            _ => Self {
                cursor: None,
                last: NaiveDate::MIN,
                logged,
            },
        }
    }
}

impl Iterator for MissingDates {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        while let Some(date) = self.cursor {
            if date > self.last {
                self.cursor = None;
                return None;
            }
            self.cursor = date.checked_add_days(Days::new(1));
            if !self.logged.contains(&date) {
                return Some(date);
            }
        }
        None
    }
}

/// One user's gap summary for the rankings page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapReport {
    /// User the gaps belong to
    pub username: String,
    /// First logged date of the span
    pub first_date: NaiveDate,
    /// Last logged date of the span
    pub last_date: NaiveDate,
    /// Number of missing days
    pub missing_days: usize,
    /// The missing dates, ascending
    pub missing_dates: Vec<NaiveDate>,
}

impl GapReport {
    /// Build a report for one user, or `None` when the span has no gaps
    pub fn for_user<I>(username: &str, dates: I) -> Option<Self>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let logged: BTreeSet<NaiveDate> = dates.into_iter().collect();
        let first_date = logged.iter().next().copied()?;
        let last_date = logged.iter().next_back().copied()?;

        let missing_dates: Vec<NaiveDate> = MissingDates::new(logged).collect();
        if missing_dates.is_empty() {
            return None;
        }

        Some(Self {
            username: username.to_owned(),
            first_date,
            last_date,
            missing_days: missing_dates.len(),
            missing_dates,
        })
    }
}
