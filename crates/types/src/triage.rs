//! Clinical triage decisions.

use crate::{AcademicYear, Programme, VaccineMethod};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The decision recorded by a nurse or prescriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageOutcome {
    ReadyToVaccinate,
    DoNotVaccinate,
    DelayVaccination,
    InviteToClinic,
    KeepInTriage,
    NeedsFollowUp,
}

/// A clinical safety decision gating vaccination for one programme.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triage {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub programme: Programme,
    pub academic_year: AcademicYear,
    pub outcome: TriageOutcome,
    /// The delivery method the clinician approved, where relevant.
    pub vaccine_method: Option<VaccineMethod>,
    /// The clinician approved a gelatine-free vaccine only.
    pub without_gelatine: bool,
    /// For delay-vaccination decisions, the date to revisit the patient.
    /// A delay decision expires once this date has passed.
    pub vaccinate_after: Option<NaiveDate>,
    pub invalidated: bool,
    pub created_at: DateTime<Utc>,
}

impl Triage {
    /// Whether this decision has lapsed and the patient needs re-triaging.
    pub fn expired(&self, today: NaiveDate) -> bool {
        match self.vaccinate_after {
            Some(date) => date < today,
            None => false,
        }
    }
}
