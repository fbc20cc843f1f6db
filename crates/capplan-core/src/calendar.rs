//! Calendar-month arithmetic
//!
//! Capacity and demand are accounted per calendar month. A month is the
//! closed range `[first day, last day]`, and a project overlaps it when
//! `start <= month_end && end >= month_start`.

use chrono::{Datelike, Months, NaiveDate};

/// A calendar month, identified by its first day
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    first: NaiveDate,
}

impl Month {
    /// The month containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: month_start(date),
        }
    }

    /// First day of the month
    pub fn start(&self) -> NaiveDate {
        self.first
    }

    /// Last day of the month
    pub fn end(&self) -> NaiveDate {
        month_end(self.first)
    }

    /// The month `n` months later
    pub fn plus(&self, n: u32) -> Self {
        Self {
            first: add_months(self.first, n),
        }
    }

    /// The month before this one
    pub fn previous(&self) -> Self {
        Self {
            first: self
                .first
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.first),
        }
    }

    /// Display label, e.g. "Jan 2025"
    pub fn label(&self) -> String {
        self.first.format("%b %Y").to_string()
    }

    /// Whether the inclusive range `[start, end]` touches this month.
    ///
    /// Missing bounds never overlap.
    pub fn overlaps(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
        match (start, end) {
            (Some(start), Some(end)) => start <= self.end() && end >= self.start(),
            _ => false,
        }
    }

    /// `count` consecutive months starting with this one
    pub fn horizon(self, count: u32) -> impl Iterator<Item = Month> {
        (0..count).map(move |i| self.plus(i))
    }
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`
pub fn month_end(date: NaiveDate) -> NaiveDate {
    add_months(month_start(date), 1)
        .pred_opt()
        .unwrap_or(date)
}

/// Add calendar months, clamping the day to the target month's length
/// (Jan 31 + 1 month = Feb 28).
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}
