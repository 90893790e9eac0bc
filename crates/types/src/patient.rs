//! Patients and age/year-group derivations.

use crate::AcademicYear;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The school year group a child starts in, offset from their birth
/// academic year (reception is entered the September after turning four).
const RECEPTION_AGE: i32 = 5;

/// A patient known to the service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub given_name: String,
    pub family_name: String,
    pub date_of_birth: NaiveDate,
}

impl Patient {
    /// The patient's school year group for a given academic year.
    ///
    /// Derived from the date of birth: a child born in the 2010 academic
    /// year (September 2010 to August 2011) is in year group 8 during the
    /// 2023 academic year.
    pub fn year_group(&self, academic_year: AcademicYear) -> i32 {
        let birth_academic_year = AcademicYear::from_date(self.date_of_birth);
        academic_year.0 - birth_academic_year.0 - RECEPTION_AGE
    }

    /// The patient's age in whole years at a given moment.
    pub fn age_years_at(&self, at: DateTime<Utc>) -> i32 {
        let date = at.date_naive();
        let mut years = date.year() - self.date_of_birth.year();
        if (date.month(), date.day()) < (self.date_of_birth.month(), self.date_of_birth.day()) {
            years -= 1;
        }
        years
    }

    /// The patient's age in whole months at a given moment.
    pub fn age_months_at(&self, at: DateTime<Utc>) -> i32 {
        let date = at.date_naive();
        let mut months = (date.year() - self.date_of_birth.year()) * 12
            + date.month() as i32
            - self.date_of_birth.month() as i32;
        if date.day() < self.date_of_birth.day() {
            months -= 1;
        }
        months
    }
}
