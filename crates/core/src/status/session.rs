//! Session outcome generation.
//!
//! Scoped to a single session visit rather than an academic year: what
//! happened (or is expected to happen) for one patient and programme at
//! one session.

use crate::error::StatusResult;
use crate::status::consent::{ConsentStatus, ConsentStatusGenerator};
use crate::status::triage::{TriageStatus, TriageStatusGenerator};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use svr_types::{
    AttendanceRecord, Consent, Patient, Programme, Session, Triage, VaccinationOutcome,
    VaccinationRecord,
};

/// The outcome of one session visit for one patient and programme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    Administered,
    AlreadyHad,
    HadContraindications,
    Refused,
    AbsentFromSchool,
    AbsentFromSession,
    NotWell,
    NoneYet,
}

/// Generator for [`SessionOutcome`].
///
/// The `consents`, `triages` and `vaccination_records` collections are
/// expected to be sorted in reverse chronological order, meaning the most
/// recent item is at the beginning of the slice.
pub struct SessionOutcomeGenerator<'a> {
    session: &'a Session,
    programme: Programme,
    patient: &'a Patient,
    consents: &'a [Consent],
    triages: &'a [Triage],
    vaccination_records: &'a [VaccinationRecord],
    attendance_record: Option<&'a AttendanceRecord>,
    today: NaiveDate,
}

impl<'a> SessionOutcomeGenerator<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session: &'a Session,
        programme: Programme,
        patient: &'a Patient,
        consents: &'a [Consent],
        triages: &'a [Triage],
        vaccination_records: &'a [VaccinationRecord],
        attendance_record: Option<&'a AttendanceRecord>,
        today: NaiveDate,
    ) -> Self {
        Self {
            session,
            programme,
            patient,
            consents,
            triages,
            vaccination_records,
            attendance_record,
            today,
        }
    }

    /// The session outcome, always exactly one of the eight values.
    ///
    /// A vaccination record for this specific session wins; otherwise a
    /// consent refusal, then a do-not-vaccinate triage, then an absence on
    /// the register, and finally [`SessionOutcome::NoneYet`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::StatusError::UnsupportedProgramme`] if the triage
    /// check hits a programme family with no dose-selection rule.
    pub fn status(&self) -> StatusResult<SessionOutcome> {
        if let Some(record) = self.session_vaccination_record() {
            return Ok(match record.outcome {
                VaccinationOutcome::Administered => SessionOutcome::Administered,
                VaccinationOutcome::AlreadyHad => SessionOutcome::AlreadyHad,
                VaccinationOutcome::Contraindications => SessionOutcome::HadContraindications,
                VaccinationOutcome::Refused => SessionOutcome::Refused,
                VaccinationOutcome::NotWell => SessionOutcome::NotWell,
                VaccinationOutcome::AbsentFromSession => SessionOutcome::AbsentFromSession,
                VaccinationOutcome::AbsentFromSchool => SessionOutcome::AbsentFromSchool,
            });
        }

        if self.consent_generator().status() == ConsentStatus::Refused {
            return Ok(SessionOutcome::Refused);
        }

        if self.triage_generator().status()? == TriageStatus::DoNotVaccinate {
            return Ok(SessionOutcome::HadContraindications);
        }

        if self.attendance_record.is_some_and(|a| !a.attending) {
            return Ok(SessionOutcome::AbsentFromSession);
        }

        Ok(SessionOutcome::NoneYet)
    }

    /// The most recent kept record for this patient, programme and
    /// session.
    fn session_vaccination_record(&self) -> Option<&'a VaccinationRecord> {
        self.vaccination_records.iter().find(|record| {
            record.kept()
                && record.patient_id == self.patient.id
                && record.programme == self.programme
                && record.session_id == Some(self.session.id)
        })
    }

    fn consent_generator(&self) -> ConsentStatusGenerator<'a> {
        ConsentStatusGenerator::new(
            self.programme,
            self.session.academic_year,
            self.patient,
            self.consents,
        )
    }

    fn triage_generator(&self) -> TriageStatusGenerator<'a> {
        TriageStatusGenerator::new(
            self.programme,
            self.session.academic_year,
            self.patient,
            self.consents,
            self.triages,
            self.vaccination_records,
            self.today,
        )
    }
}
