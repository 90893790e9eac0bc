//! Vaccination sessions.

use crate::{AcademicYear, Programme};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A visit to a location on one or more dates, offering one or more
/// programmes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub location_id: Uuid,
    pub academic_year: AcademicYear,
    pub dates: Vec<NaiveDate>,
    pub programmes: Vec<Programme>,
}

impl Session {
    /// Whether the session has a date on the given day.
    pub fn held_on(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }
}
