//! Programme status generation.
//!
//! Composes the consent, triage and vaccination generators (plus today's
//! attendance) into a single programme-level status for one patient and
//! academic year. The cascade below is evaluated strictly top-down and its
//! ordering is load-bearing: a vaccinated patient reports as vaccinated
//! even if their consent is simultaneously refused.

use crate::error::StatusResult;
use crate::status::consent::{ConsentStatus, ConsentStatusGenerator};
use crate::status::triage::{TriageStatus, TriageStatusGenerator};
use crate::status::vaccination::{
    LatestSessionStatus, VaccinationStatus, VaccinationStatusGenerator,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use svr_types::{
    AcademicYear, AttendanceRecord, Consent, Patient, PatientLocation, Programme, Triage,
    VaccinationRecord, VaccineMethod,
};

/// The programme-level status for one patient, programme and academic
/// year. Exactly one value is produced per evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgrammeStatus {
    VaccinatedAlready,
    VaccinatedFully,
    CannotVaccinateUnwell,
    CannotVaccinateRefused,
    CannotVaccinateContraindicated,
    CannotVaccinateAbsent,
    CannotVaccinateDelayVaccination,
    CannotVaccinateDoNotVaccinate,
    Due,
    NeedsTriage,
    HasRefusalConsentConflicts,
    HasRefusalConsentRefused,
    NeedsConsentFollowUpRequested,
    NeedsConsentNoResponse,
    NeedsConsentRequestFailed,
    NeedsConsentRequestScheduled,
    NeedsConsentRequestNotScheduled,
    NotEligible,
}

/// Generator for [`ProgrammeStatus`] and its derived attributes.
///
/// Holds one lazily-constructed instance of each sub-generator; like every
/// generator, an instance is tied to a single evidence snapshot and must
/// not be reused once any input collection changes.
///
/// The `consents`, `triages` and `vaccination_records` collections are
/// expected to be sorted in reverse chronological order, meaning the most
/// recent item is at the beginning of the slice.
pub struct ProgrammeStatusGenerator<'a> {
    programme: Programme,
    academic_year: AcademicYear,
    patient: &'a Patient,
    patient_locations: &'a [PatientLocation],
    consents: &'a [Consent],
    triages: &'a [Triage],
    attendance_record: Option<&'a AttendanceRecord>,
    vaccination_records: &'a [VaccinationRecord],
    today: NaiveDate,
    consent_generator: OnceCell<ConsentStatusGenerator<'a>>,
    triage_generator: OnceCell<TriageStatusGenerator<'a>>,
    vaccination_generator: OnceCell<VaccinationStatusGenerator<'a>>,
}

impl<'a> ProgrammeStatusGenerator<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        programme: Programme,
        academic_year: AcademicYear,
        patient: &'a Patient,
        patient_locations: &'a [PatientLocation],
        consents: &'a [Consent],
        triages: &'a [Triage],
        attendance_record: Option<&'a AttendanceRecord>,
        vaccination_records: &'a [VaccinationRecord],
        today: NaiveDate,
    ) -> Self {
        Self {
            programme,
            academic_year,
            patient,
            patient_locations,
            consents,
            triages,
            attendance_record,
            vaccination_records,
            today,
            consent_generator: OnceCell::new(),
            triage_generator: OnceCell::new(),
            vaccination_generator: OnceCell::new(),
        }
    }

    /// The programme status. First matching rule wins; do not reorder.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StatusError::UnsupportedProgramme`] if the
    /// vaccination generator hits a programme family with no
    /// dose-selection rule.
    pub fn status(&self) -> StatusResult<ProgrammeStatus> {
        let status = if self.should_be_vaccinated_already()? {
            ProgrammeStatus::VaccinatedAlready
        } else if self.should_be_vaccinated_fully()? {
            ProgrammeStatus::VaccinatedFully
        } else if self.should_be_cannot_vaccinate(LatestSessionStatus::Unwell)? {
            ProgrammeStatus::CannotVaccinateUnwell
        } else if self.should_be_cannot_vaccinate(LatestSessionStatus::Refused)? {
            ProgrammeStatus::CannotVaccinateRefused
        } else if self.should_be_cannot_vaccinate(LatestSessionStatus::Contraindicated)? {
            ProgrammeStatus::CannotVaccinateContraindicated
        } else if self.should_be_cannot_vaccinate(LatestSessionStatus::Absent)? {
            ProgrammeStatus::CannotVaccinateAbsent
        } else if self.should_be_cannot_vaccinate_delay_vaccination()? {
            ProgrammeStatus::CannotVaccinateDelayVaccination
        } else if self.should_be_cannot_vaccinate_do_not_vaccinate()? {
            ProgrammeStatus::CannotVaccinateDoNotVaccinate
        } else if self.should_be_due()? {
            ProgrammeStatus::Due
        } else if self.should_be_needs_triage()? {
            ProgrammeStatus::NeedsTriage
        } else if self.should_be_has_refusal_consent_conflicts() {
            ProgrammeStatus::HasRefusalConsentConflicts
        } else if self.should_be_has_refusal_consent_refused() {
            ProgrammeStatus::HasRefusalConsentRefused
        } else if self.should_be_needs_consent_follow_up_requested() {
            ProgrammeStatus::NeedsConsentFollowUpRequested
        } else if self.should_be_needs_consent_no_response()? {
            ProgrammeStatus::NeedsConsentNoResponse
        } else if self.should_be_needs_consent_request_failed() {
            ProgrammeStatus::NeedsConsentRequestFailed
        } else if self.should_be_needs_consent_request_scheduled() {
            ProgrammeStatus::NeedsConsentRequestScheduled
        } else if self.should_be_needs_consent_request_not_scheduled() {
            ProgrammeStatus::NeedsConsentRequestNotScheduled
        } else {
            ProgrammeStatus::NotEligible
        };

        tracing::debug!(
            patient_id = %self.patient.id,
            programme = %self.programme,
            academic_year = %self.academic_year,
            ?status,
            "generated programme status"
        );

        Ok(status)
    }

    /// The dose sequence to record against this status, populated only
    /// when the patient is clinically cleared and consented.
    pub fn dose_sequence(&self) -> StatusResult<Option<u32>> {
        let triage_status = self.triage_generator().status()?;

        if matches!(
            triage_status,
            TriageStatus::SafeToVaccinate | TriageStatus::NotRequired
        ) && self.consent_generator().status() == ConsentStatus::Given
        {
            self.vaccination_generator().dose_sequence()
        } else {
            Ok(None)
        }
    }

    /// Whether a gelatine-free vaccine was asked for, with the triage
    /// answer taking precedence over consent. `None` whenever vaccination
    /// is off the table.
    pub fn without_gelatine(&self) -> StatusResult<Option<bool>> {
        if self.vaccination_blocked()? {
            return Ok(None);
        }

        Ok(Some(
            self.triage_generator().without_gelatine()?
                || self.consent_generator().without_gelatine(),
        ))
    }

    /// The agreed delivery methods, with a triage-approved method taking
    /// precedence over the consent intersection. `None` whenever
    /// vaccination is off the table.
    pub fn vaccine_methods(&self) -> StatusResult<Option<Vec<VaccineMethod>>> {
        if self.vaccination_blocked()? {
            return Ok(None);
        }

        if let Some(method) = self.triage_generator().vaccine_method()? {
            Ok(Some(vec![method]))
        } else {
            Ok(Some(self.consent_generator().vaccine_methods()))
        }
    }

    /// The date most relevant to the status: the delay-until date where
    /// triage delayed vaccination, otherwise the vaccination generator's
    /// most recent relevant date.
    pub fn date(&self) -> StatusResult<Option<NaiveDate>> {
        if let Some(date) = self.triage_generator().delay_vaccination_until_date()? {
            return Ok(Some(date));
        }

        self.vaccination_generator().latest_date()
    }

    fn vaccination_blocked(&self) -> StatusResult<bool> {
        Ok(self.vaccination_generator().status()? == VaccinationStatus::NotEligible
            || matches!(
                self.triage_generator().status()?,
                TriageStatus::Required | TriageStatus::DoNotVaccinate
            )
            || matches!(
                self.consent_generator().status(),
                ConsentStatus::NoResponse | ConsentStatus::Conflicts | ConsentStatus::Refused
            ))
    }

    fn should_be_vaccinated_already(&self) -> StatusResult<bool> {
        Ok(self.vaccination_generator().status()? == VaccinationStatus::Vaccinated
            && self.vaccination_generator().latest_session_status()?
                == Some(LatestSessionStatus::AlreadyHad))
    }

    fn should_be_vaccinated_fully(&self) -> StatusResult<bool> {
        Ok(self.vaccination_generator().status()? == VaccinationStatus::Vaccinated)
    }

    /// Today's session visit ended without a vaccination for the given
    /// reason, and the patient is still eligible or due.
    fn should_be_cannot_vaccinate(&self, reason: LatestSessionStatus) -> StatusResult<bool> {
        Ok(self.eligible_or_due()?
            && self.vaccination_generator().latest_session_status()? == Some(reason)
            && self.vaccination_generator().latest_date()? == Some(self.today))
    }

    fn should_be_cannot_vaccinate_delay_vaccination(&self) -> StatusResult<bool> {
        Ok(self.eligible_or_due()?
            && self.triage_generator().status()? == TriageStatus::DelayVaccination)
    }

    fn should_be_cannot_vaccinate_do_not_vaccinate(&self) -> StatusResult<bool> {
        Ok(self.eligible_or_due()?
            && self.triage_generator().status()? == TriageStatus::DoNotVaccinate)
    }

    fn should_be_due(&self) -> StatusResult<bool> {
        Ok(self.vaccination_generator().status()? == VaccinationStatus::Due)
    }

    fn should_be_needs_triage(&self) -> StatusResult<bool> {
        Ok(matches!(
            self.triage_generator().status()?,
            TriageStatus::Required | TriageStatus::InviteToClinic
        ))
    }

    fn should_be_has_refusal_consent_conflicts(&self) -> bool {
        self.consent_generator().status() == ConsentStatus::Conflicts
    }

    fn should_be_has_refusal_consent_refused(&self) -> bool {
        self.consent_generator().status() == ConsentStatus::Refused
    }

    fn should_be_needs_consent_no_response(&self) -> StatusResult<bool> {
        Ok(self.vaccination_generator().status()? == VaccinationStatus::Eligible
            && self.consent_generator().status() == ConsentStatus::NoResponse)
    }

    // The four consent-request statuses below are reserved: no rule
    // produces them yet, but removing the branches would silently change
    // behaviour for callers that enumerate the full taxonomy.

    fn should_be_needs_consent_follow_up_requested(&self) -> bool {
        false
    }

    fn should_be_needs_consent_request_failed(&self) -> bool {
        false
    }

    fn should_be_needs_consent_request_scheduled(&self) -> bool {
        false
    }

    fn should_be_needs_consent_request_not_scheduled(&self) -> bool {
        false
    }

    fn eligible_or_due(&self) -> StatusResult<bool> {
        Ok(matches!(
            self.vaccination_generator().status()?,
            VaccinationStatus::Eligible | VaccinationStatus::Due
        ))
    }

    fn consent_generator(&self) -> &ConsentStatusGenerator<'a> {
        self.consent_generator.get_or_init(|| {
            ConsentStatusGenerator::new(
                self.programme,
                self.academic_year,
                self.patient,
                self.consents,
            )
        })
    }

    fn triage_generator(&self) -> &TriageStatusGenerator<'a> {
        self.triage_generator.get_or_init(|| {
            TriageStatusGenerator::new(
                self.programme,
                self.academic_year,
                self.patient,
                self.consents,
                self.triages,
                self.vaccination_records,
                self.today,
            )
        })
    }

    fn vaccination_generator(&self) -> &VaccinationStatusGenerator<'a> {
        self.vaccination_generator.get_or_init(|| {
            VaccinationStatusGenerator::new(
                self.programme,
                self.academic_year,
                self.patient,
                self.patient_locations,
                self.consents,
                self.triages,
                self.attendance_record,
                self.vaccination_records,
                self.today,
            )
        })
    }
}
