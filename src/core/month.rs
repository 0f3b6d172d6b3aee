//! Calendar month handling.
//!
//! Subscriptions are billed per month, so every date that crosses the API boundary is a
//! `MM-YYYY` string. Internally a month is stored as the first day of that month, which
//! keeps SQL range comparisons on plain `DATE` columns.

use crate::errors::{Error, Result};
use chrono::{Datelike, NaiveDate};
use std::{fmt, str::FromStr};

/// A year and month with no day component.
///
/// Field order matters: the derived `Ord` compares the year first, then the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BillingMonth {
    year: i32,
    month: u32,
}

impl BillingMonth {
    /// Builds a month from its parts, rejecting months outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        // from_ymd_opt also rejects years chrono cannot represent
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// Parses the strict `MM-YYYY` form: two month digits, a dash, four year digits.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || Error::InvalidMonth {
            value: text.to_string(),
        };

        let (month, year) = text.split_once('-').ok_or_else(invalid)?;
        if month.len() != 2 || year.len() != 4 {
            return Err(invalid());
        }
        if !month.bytes().chain(year.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let month: u32 = month.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }

    /// Parses an optional month, passing `None` through.
    pub fn parse_optional(text: Option<&str>) -> Result<Option<Self>> {
        text.map(Self::parse).transpose()
    }

    /// The month containing `date`; the day is discarded.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The first day of the month, which is how months are persisted.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        // Both constructors validate year and month, so day 1 always exists
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }
}

impl fmt::Display for BillingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month, self.year)
    }
}

impl FromStr for BillingMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Renders a stored date back to its `MM-YYYY` form.
#[must_use]
pub fn format_month(date: NaiveDate) -> String {
    BillingMonth::from_date(date).to_string()
}
