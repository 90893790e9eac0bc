//! Locations and patient enrolment.

use crate::{AcademicYear, Programme};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A school or clinic where sessions are held.
///
/// Each location configures, per programme, the year groups it offers that
/// programme to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub programme_year_groups: HashMap<Programme, Vec<i32>>,
}

impl Location {
    /// The year groups this location offers a programme to.
    pub fn year_groups(&self, programme: Programme) -> &[i32] {
        self.programme_year_groups
            .get(&programme)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Links a patient to a location for one academic year.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientLocation {
    pub patient_id: Uuid,
    pub academic_year: AcademicYear,
    pub location: Location,
}

impl PatientLocation {
    /// Whether this enrolment offers a programme to a given year group.
    pub fn offers(&self, programme: Programme, year_group: i32) -> bool {
        self.location.year_groups(programme).contains(&year_group)
    }
}
