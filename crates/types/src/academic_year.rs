//! Academic years.
//!
//! An academic year runs from 1 September to 31 August and is named by the
//! calendar year it starts in, so "2024" means September 2024 to August 2025.
//! All programme-scoped evidence carries the academic year it belongs to.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// The month an academic year starts in (September).
const FIRST_MONTH: u32 = 9;

/// An academic year, identified by its starting calendar year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AcademicYear(pub i32);

impl AcademicYear {
    /// Returns the academic year a given date falls in.
    ///
    /// Dates in September or later belong to the academic year starting that
    /// calendar year; dates before September belong to the previous one.
    pub fn from_date(date: NaiveDate) -> Self {
        if date.month() >= FIRST_MONTH {
            Self(date.year())
        } else {
            Self(date.year() - 1)
        }
    }

    /// The first day of the academic year (1 September).
    pub fn starts_on(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.0, FIRST_MONTH, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    /// The last day of the academic year (31 August of the following year).
    pub fn ends_on(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.0 + 1, FIRST_MONTH - 1, 31)
            .unwrap_or(NaiveDate::MAX)
    }

    /// The academic year before this one.
    pub fn previous(self) -> Self {
        Self(self.0 - 1)
    }

    /// The academic year after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.0, self.0 + 1)
    }
}

impl From<i32> for AcademicYear {
    fn from(year: i32) -> Self {
        Self(year)
    }
}
