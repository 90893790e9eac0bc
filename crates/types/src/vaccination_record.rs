//! Vaccination records.
//!
//! An administered-or-not event for one patient and programme. Records with
//! a non-administered outcome explain why vaccination did not happen at a
//! particular session.

use crate::{AcademicYear, Programme, VaccineMethod};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What happened at the point of vaccination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VaccinationOutcome {
    Administered,
    /// The patient had already received this vaccination elsewhere.
    AlreadyHad,
    Refused,
    NotWell,
    Contraindications,
    AbsentFromSession,
    AbsentFromSchool,
}

/// A vaccination event for one patient and programme.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccinationRecord {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub programme: Programme,
    pub academic_year: AcademicYear,
    pub outcome: VaccinationOutcome,
    pub dose_sequence: Option<u32>,
    pub vaccine_method: Option<VaccineMethod>,
    pub performed_at: DateTime<Utc>,
    pub session_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    /// Recorded at the point of care in this service, rather than imported
    /// from a historical data set.
    pub recorded_in_service: bool,
    /// Soft-deleted records are excluded from all status generation.
    pub discarded: bool,
}

impl VaccinationRecord {
    pub fn administered(&self) -> bool {
        self.outcome == VaccinationOutcome::Administered
    }

    pub fn already_had(&self) -> bool {
        self.outcome == VaccinationOutcome::AlreadyHad
    }

    pub fn refused(&self) -> bool {
        self.outcome == VaccinationOutcome::Refused
    }

    pub fn unwell(&self) -> bool {
        self.outcome == VaccinationOutcome::NotWell
    }

    pub fn contraindicated(&self) -> bool {
        self.outcome == VaccinationOutcome::Contraindications
    }

    /// Either kind of absence.
    pub fn absent(&self) -> bool {
        matches!(
            self.outcome,
            VaccinationOutcome::AbsentFromSession | VaccinationOutcome::AbsentFromSchool
        )
    }

    pub fn kept(&self) -> bool {
        !self.discarded
    }

    pub fn performed_on(&self) -> NaiveDate {
        self.performed_at.date_naive()
    }
}
