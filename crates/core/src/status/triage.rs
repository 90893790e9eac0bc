//! Triage status generation.
//!
//! Determines whether clinical triage gates vaccination for a patient and
//! programme. A vaccinated patient never needs triage, whatever the triage
//! records say; otherwise the latest non-invalidated decision wins, and in
//! the absence of one the consent responses and vaccination history decide
//! whether triage is required at all.

use crate::error::StatusResult;
use crate::status::consent::{ConsentStatus, ConsentStatusGenerator};
use crate::status::vaccination::VaccinationStatusGenerator;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use svr_types::{
    AcademicYear, Consent, Patient, Programme, Triage, TriageOutcome, VaccinationRecord,
    VaccineMethod,
};

/// The reduced triage position for one patient, programme and academic
/// year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageStatus {
    NotRequired,
    Required,
    SafeToVaccinate,
    DoNotVaccinate,
    DelayVaccination,
    InviteToClinic,
}

/// Generator for [`TriageStatus`] and its derived attributes.
///
/// The `consents`, `triages` and `vaccination_records` collections are
/// expected to be sorted in reverse chronological order, meaning the most
/// recent item is at the beginning of the slice.
pub struct TriageStatusGenerator<'a> {
    programme: Programme,
    academic_year: AcademicYear,
    patient: &'a Patient,
    consents: &'a [Consent],
    triages: &'a [Triage],
    vaccination_records: &'a [VaccinationRecord],
    today: NaiveDate,
    consent_generator: OnceCell<ConsentStatusGenerator<'a>>,
    latest_triage: OnceCell<Option<&'a Triage>>,
    vaccinated: OnceCell<StatusResult<bool>>,
}

impl<'a> TriageStatusGenerator<'a> {
    pub fn new(
        programme: Programme,
        academic_year: AcademicYear,
        patient: &'a Patient,
        consents: &'a [Consent],
        triages: &'a [Triage],
        vaccination_records: &'a [VaccinationRecord],
        today: NaiveDate,
    ) -> Self {
        Self {
            programme,
            academic_year,
            patient,
            consents,
            triages,
            vaccination_records,
            today,
            consent_generator: OnceCell::new(),
            latest_triage: OnceCell::new(),
            vaccinated: OnceCell::new(),
        }
    }

    /// The triage status, always exactly one of the six values.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StatusError::UnsupportedProgramme`] if the
    /// vaccinated check hits a programme family with no dose-selection
    /// rule.
    pub fn status(&self) -> StatusResult<TriageStatus> {
        // A vaccinated patient never needs triage.
        if self.vaccinated()? {
            return Ok(TriageStatus::NotRequired);
        }

        if let Some(triage) = self.latest_triage() {
            let expired = triage.expired(self.today);

            match triage.outcome {
                TriageOutcome::ReadyToVaccinate => return Ok(TriageStatus::SafeToVaccinate),
                TriageOutcome::DoNotVaccinate => return Ok(TriageStatus::DoNotVaccinate),
                TriageOutcome::DelayVaccination if !expired => {
                    return Ok(TriageStatus::DelayVaccination)
                }
                TriageOutcome::InviteToClinic => return Ok(TriageStatus::InviteToClinic),
                TriageOutcome::KeepInTriage | TriageOutcome::NeedsFollowUp => {
                    return Ok(TriageStatus::Required)
                }
                _ if expired => return Ok(TriageStatus::Required),
                _ => {}
            }
        }

        if self.should_be_required()? {
            Ok(TriageStatus::Required)
        } else {
            Ok(TriageStatus::NotRequired)
        }
    }

    /// The delivery method the clinician approved, populated only when the
    /// status is [`TriageStatus::SafeToVaccinate`].
    pub fn vaccine_method(&self) -> StatusResult<Option<VaccineMethod>> {
        if self.status()? == TriageStatus::SafeToVaccinate {
            Ok(self.latest_triage().and_then(|t| t.vaccine_method))
        } else {
            Ok(None)
        }
    }

    /// Whether the clinician approved a gelatine-free vaccine only,
    /// populated only when the status is [`TriageStatus::SafeToVaccinate`].
    pub fn without_gelatine(&self) -> StatusResult<bool> {
        if self.status()? == TriageStatus::SafeToVaccinate {
            Ok(self.latest_triage().is_some_and(|t| t.without_gelatine))
        } else {
            Ok(false)
        }
    }

    /// The date vaccination was delayed until, populated only when the
    /// status is [`TriageStatus::DelayVaccination`].
    pub fn delay_vaccination_until_date(&self) -> StatusResult<Option<NaiveDate>> {
        if self.status()? == TriageStatus::DelayVaccination {
            Ok(self.latest_triage().and_then(|t| t.vaccinate_after))
        } else {
            Ok(None)
        }
    }

    /// Consent answers or vaccination history can require triage even with
    /// no triage record on file.
    fn should_be_required(&self) -> StatusResult<bool> {
        if self.consent_generator().status() != ConsentStatus::Given {
            return Ok(false);
        }

        if self.consent_generator().requires_triage() {
            return Ok(true);
        }

        // An administered dose in the history of a programme that triages
        // on vaccination history, which nonetheless fails the programme's
        // fully-vaccinated criteria (the vaccinated check above has already
        // ruled that out).
        Ok(self.programme.triage_on_vaccination_history()
            && self.vaccination_records.iter().any(|record| {
                record.kept()
                    && record.patient_id == self.patient.id
                    && record.programme == self.programme
                    && record.academic_year <= self.academic_year
                    && record.administered()
            }))
    }

    fn latest_triage(&self) -> Option<&'a Triage> {
        *self.latest_triage.get_or_init(|| {
            self.triages
                .iter()
                .filter(|triage| {
                    triage.patient_id == self.patient.id
                        && triage.programme == self.programme
                        && triage.academic_year == self.academic_year
                        && !triage.invalidated
                })
                .max_by_key(|triage| triage.created_at)
        })
    }

    fn vaccinated(&self) -> StatusResult<bool> {
        self.vaccinated
            .get_or_init(|| {
                VaccinationStatusGenerator::new(
                    self.programme,
                    self.academic_year,
                    self.patient,
                    &[],
                    self.consents,
                    self.triages,
                    None,
                    self.vaccination_records,
                    self.today,
                )
                .vaccinated()
            })
            .clone()
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
}
