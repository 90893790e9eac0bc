//! Vaccination status generation.
//!
//! Determines whether a patient is vaccinated for a programme, and if not,
//! whether they are due or merely eligible. The hard part is picking the
//! "qualifying" record, the historical record that programme-specific
//! rules accept as proof of completed vaccination, which differs per
//! programme family.

use crate::error::{StatusError, StatusResult};
use crate::status::consent::{ConsentStatus, ConsentStatusGenerator};
use crate::status::triage::{TriageStatus, TriageStatusGenerator};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use svr_types::{
    AcademicYear, AttendanceRecord, Consent, Patient, PatientLocation, Programme, Triage,
    VaccinationRecord,
};
use uuid::Uuid;

/// The earliest age (in whole years) at which a dose counts towards the
/// adolescent MenACWY and Td/IPV programmes.
const DOUBLES_MINIMUM_AGE_YEARS: i32 = 10;

/// MMR catch-up rules: first dose at twelve months or later, second dose at
/// fifteen months or later and at least four weeks after the first.
const MMR_FIRST_DOSE_MINIMUM_AGE_MONTHS: i32 = 12;
const MMR_SECOND_DOSE_MINIMUM_AGE_MONTHS: i32 = 15;
const MMR_MINIMUM_DOSE_INTERVAL_DAYS: i64 = 28;

/// The reduced vaccination position for one patient, programme and academic
/// year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VaccinationStatus {
    /// A qualifying record exists.
    Vaccinated,
    /// Eligible, consented and clinically cleared.
    Due,
    /// Offered by a current location, but not yet due.
    Eligible,
    NotEligible,
}

/// Why the most recent session visit did not (or did not need to) result in
/// an administered vaccination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatestSessionStatus {
    AlreadyHad,
    Contraindicated,
    Refused,
    Absent,
    Unwell,
}

/// Generator for [`VaccinationStatus`] and its derived attributes.
///
/// The `consents`, `triages` and `vaccination_records` collections are
/// expected to be sorted in reverse chronological order, meaning the most
/// recent item is at the beginning of the slice.
pub struct VaccinationStatusGenerator<'a> {
    programme: Programme,
    academic_year: AcademicYear,
    patient: &'a Patient,
    patient_locations: &'a [PatientLocation],
    consents: &'a [Consent],
    triages: &'a [Triage],
    attendance_record: Option<&'a AttendanceRecord>,
    today: NaiveDate,
    /// The caller's unfiltered collection, passed on to sub-generators
    /// that re-filter it themselves.
    vaccination_records: &'a [VaccinationRecord],
    /// Kept records for this patient and programme within the programme's
    /// academic-year scope, newest first.
    records: Vec<&'a VaccinationRecord>,
    valid_records: OnceCell<StatusResult<Vec<&'a VaccinationRecord>>>,
    qualifying_record: OnceCell<StatusResult<Option<&'a VaccinationRecord>>>,
    eligible: OnceCell<bool>,
}

impl<'a> VaccinationStatusGenerator<'a> {
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
        // Seasonal programmes only count evidence from the year in
        // question; other programmes accept any earlier year too.
        let records = vaccination_records
            .iter()
            .filter(|record| {
                record.kept()
                    && record.patient_id == patient.id
                    && record.programme == programme
                    && if programme.seasonal() {
                        record.academic_year == academic_year
                    } else {
                        record.academic_year <= academic_year
                    }
            })
            .collect();

        Self {
            programme,
            academic_year,
            patient,
            patient_locations,
            consents,
            triages,
            attendance_record,
            today,
            vaccination_records,
            records,
            valid_records: OnceCell::new(),
            qualifying_record: OnceCell::new(),
            eligible: OnceCell::new(),
        }
    }

    /// The vaccination status, always exactly one of the four values.
    ///
    /// # Errors
    ///
    /// Returns [`StatusError::UnsupportedProgramme`] if no dose-selection
    /// rule covers the programme family.
    pub fn status(&self) -> StatusResult<VaccinationStatus> {
        if self.vaccinated()? {
            Ok(VaccinationStatus::Vaccinated)
        } else if self.should_be_due()? {
            Ok(VaccinationStatus::Due)
        } else if self.is_eligible() {
            Ok(VaccinationStatus::Eligible)
        } else {
            Ok(VaccinationStatus::NotEligible)
        }
    }

    /// Whether a qualifying vaccination record exists.
    pub fn vaccinated(&self) -> StatusResult<bool> {
        Ok(self.qualifying_record()?.is_some())
    }

    /// The dose sequence to report for this patient.
    ///
    /// For a vaccinated patient this is the qualifying record's sequence
    /// (or the programme default when the record does not carry one); for a
    /// due or eligible patient it is the next dose they would receive.
    pub fn dose_sequence(&self) -> StatusResult<Option<u32>> {
        if let Some(record) = self.qualifying_record()? {
            return Ok(Some(
                record
                    .dose_sequence
                    .unwrap_or_else(|| self.programme.default_dose_sequence()),
            ));
        }

        if self.is_eligible() {
            let next = self.valid_records()?.len() as u32 + 1;
            Ok(Some(next.min(self.programme.maximum_dose_sequence())))
        } else {
            Ok(None)
        }
    }

    /// The most recent date relevant to the status: the qualifying record's
    /// date when vaccinated, otherwise the newest record (and, for an
    /// absence, the attendance date if later).
    pub fn latest_date(&self) -> StatusResult<Option<NaiveDate>> {
        if let Some(record) = self.qualifying_record()? {
            return Ok(Some(record.performed_on()));
        }

        let newest_record_date = self.records.iter().map(|r| r.performed_on()).max();

        if self.latest_session_absent() {
            let attendance_date = self.attendance_record.map(|a| a.date);
            Ok(newest_record_date.max(attendance_date))
        } else {
            Ok(newest_record_date)
        }
    }

    /// The location of the qualifying record, for vaccinated patients.
    pub fn latest_location_id(&self) -> StatusResult<Option<Uuid>> {
        Ok(self.qualifying_record()?.and_then(|r| r.location_id))
    }

    /// How the most recent session visit ended, where that visit did not
    /// produce a qualifying vaccination.
    pub fn latest_session_status(&self) -> StatusResult<Option<LatestSessionStatus>> {
        if let Some(record) = self.qualifying_record()? {
            return Ok(record.already_had().then_some(LatestSessionStatus::AlreadyHad));
        }

        if !self.is_eligible() {
            return Ok(None);
        }

        let newest = self.records.first();

        Ok(if newest.is_some_and(|r| r.contraindicated()) {
            Some(LatestSessionStatus::Contraindicated)
        } else if newest.is_some_and(|r| r.refused()) {
            Some(LatestSessionStatus::Refused)
        } else if self.latest_session_absent() {
            Some(LatestSessionStatus::Absent)
        } else if newest.is_some_and(|r| r.unwell()) {
            Some(LatestSessionStatus::Unwell)
        } else {
            None
        })
    }

    fn latest_session_absent(&self) -> bool {
        self.records.first().is_some_and(|r| r.absent())
            || self.attendance_record.is_some_and(|a| !a.attending)
    }

    fn should_be_due(&self) -> StatusResult<bool> {
        if !self.is_eligible() {
            return Ok(false);
        }

        if self.consent_generator().status() != ConsentStatus::Given {
            return Ok(false);
        }

        let triage_status = self.triage_generator().status()?;
        Ok(matches!(
            triage_status,
            TriageStatus::SafeToVaccinate | TriageStatus::NotRequired
        ))
    }

    /// Whether any of the patient's locations for this academic year offers
    /// the programme to their year group.
    fn is_eligible(&self) -> bool {
        *self.eligible.get_or_init(|| {
            let year_group = self.patient.year_group(self.academic_year);

            self.patient_locations
                .iter()
                .filter(|pl| pl.academic_year == self.academic_year)
                .any(|pl| pl.offers(self.programme, year_group))
        })
    }

    /// The records that count towards this programme, per family rules.
    fn valid_records(&self) -> StatusResult<&[&'a VaccinationRecord]> {
        self.valid_records
            .get_or_init(|| self.select_valid_records())
            .as_ref()
            .map(Vec::as_slice)
            .map_err(Clone::clone)
    }

    fn select_valid_records(&self) -> StatusResult<Vec<&'a VaccinationRecord>> {
        if self.programme.seasonal() {
            return Ok(self
                .records
                .iter()
                .filter(|r| r.administered() || r.already_had())
                .copied()
                .collect());
        }

        let already_had: Vec<_> = self.records.iter().filter(|r| r.already_had()).copied().collect();
        if !already_had.is_empty() {
            return Ok(already_had);
        }

        let administered: Vec<_> =
            self.records.iter().filter(|r| r.administered()).copied().collect();

        if self.programme.doubles() {
            Ok(administered
                .into_iter()
                .filter(|r| self.patient.age_years_at(r.performed_at) >= DOUBLES_MINIMUM_AGE_YEARS)
                .collect())
        } else if self.programme.hpv() {
            Ok(administered)
        } else if self.programme.mmr() {
            Ok(self.select_mmr_records(administered))
        } else {
            Err(StatusError::UnsupportedProgramme(self.programme))
        }
    }

    /// A child who has not had two doses of MMR, with the first above one
    /// year of age and the second above fifteen months and at least four
    /// weeks later, remains eligible for catch-up doses until they have two
    /// valid ones.
    fn select_mmr_records(
        &self,
        administered: Vec<&'a VaccinationRecord>,
    ) -> Vec<&'a VaccinationRecord> {
        let mut sorted = administered;
        sorted.sort_by_key(|r| r.performed_at);

        let Some(first_dose) = sorted.iter().find(|r| {
            self.patient.age_months_at(r.performed_at) >= MMR_FIRST_DOSE_MINIMUM_AGE_MONTHS
        }) else {
            return Vec::new();
        };

        let second_dose = sorted.iter().find(|r| {
            r.performed_at > first_dose.performed_at + Duration::days(MMR_MINIMUM_DOSE_INTERVAL_DAYS)
                && self.patient.age_months_at(r.performed_at) >= MMR_SECOND_DOSE_MINIMUM_AGE_MONTHS
        });

        // Newest first, matching the ordering contract of `records`.
        second_dose
            .into_iter()
            .chain(std::iter::once(first_dose))
            .copied()
            .collect()
    }

    /// The record accepted as proof of completed vaccination, if any.
    fn qualifying_record(&self) -> StatusResult<Option<&'a VaccinationRecord>> {
        self.qualifying_record
            .get_or_init(|| {
                let valid = self.valid_records()?;

                if let Some(already_had) = valid.iter().copied().find(|r| r.already_had()) {
                    return Ok(Some(already_had));
                }

                if self.programme.mmr() {
                    if valid.len() >= self.programme.maximum_dose_sequence() as usize {
                        Ok(valid.first().copied())
                    } else {
                        Ok(None)
                    }
                } else if self.programme.td_ipv() {
                    let final_dose = self.programme.maximum_dose_sequence();
                    Ok(valid
                        .iter()
                        .find(|r| {
                            r.dose_sequence == Some(final_dose)
                                || (r.dose_sequence.is_none() && r.recorded_in_service)
                        })
                        .copied())
                } else {
                    Ok(valid.first().copied())
                }
            })
            .clone()
    }

    fn consent_generator(&self) -> ConsentStatusGenerator<'a> {
        ConsentStatusGenerator::new(
            self.programme,
            self.academic_year,
            self.patient,
            self.consents,
        )
    }

    fn triage_generator(&self) -> TriageStatusGenerator<'a> {
        TriageStatusGenerator::new(
            self.programme,
            self.academic_year,
            self.patient,
            self.consents,
            self.triages,
            self.vaccination_records,
            self.today,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{
        academic_year, consent, enrolment, patient, today, triage, vaccination_record,
    };
    use chrono::TimeZone;
    use chrono::Utc;
    use svr_types::TriageOutcome;
    use svr_types::VaccinationOutcome;

    struct Evidence {
        patient: Patient,
        locations: Vec<PatientLocation>,
        consents: Vec<Consent>,
        triages: Vec<Triage>,
        records: Vec<VaccinationRecord>,
    }

    impl Evidence {
        fn new(programme: Programme, year_groups: &[i32]) -> Self {
            let patient = patient();
            let locations = vec![enrolment(&patient, programme, year_groups)];
            Self {
                patient,
                locations,
                consents: Vec::new(),
                triages: Vec::new(),
                records: Vec::new(),
            }
        }

        fn generator(&self, programme: Programme) -> VaccinationStatusGenerator<'_> {
            VaccinationStatusGenerator::new(
                programme,
                academic_year(),
                &self.patient,
                &self.locations,
                &self.consents,
                &self.triages,
                None,
                &self.records,
                today(),
            )
        }
    }

    #[test]
    fn no_location_offering_the_programme_means_not_eligible() {
        let evidence = Evidence::new(Programme::Hpv, &[10, 11]);
        let generator = evidence.generator(Programme::Hpv);

        assert_eq!(generator.status(), Ok(VaccinationStatus::NotEligible));
    }

    #[test]
    fn an_eligible_unconsented_patient_is_eligible() {
        let evidence = Evidence::new(Programme::Hpv, &[8, 9]);
        let generator = evidence.generator(Programme::Hpv);

        assert_eq!(generator.status(), Ok(VaccinationStatus::Eligible));
    }

    #[test]
    fn an_eligible_consented_untriaged_patient_is_due() {
        let mut evidence = Evidence::new(Programme::Hpv, &[8, 9]);
        evidence.consents = vec![consent(&evidence.patient, Programme::Hpv).given().build()];
        let generator = evidence.generator(Programme::Hpv);

        assert_eq!(generator.status(), Ok(VaccinationStatus::Due));
        assert_eq!(generator.dose_sequence(), Ok(Some(1)));
    }

    #[test]
    fn a_do_not_vaccinate_triage_blocks_due() {
        let mut evidence = Evidence::new(Programme::Hpv, &[8, 9]);
        evidence.consents = vec![consent(&evidence.patient, Programme::Hpv).given().build()];
        evidence.triages =
            vec![triage(&evidence.patient, Programme::Hpv, TriageOutcome::DoNotVaccinate).build()];
        let generator = evidence.generator(Programme::Hpv);

        assert_eq!(generator.status(), Ok(VaccinationStatus::Eligible));
    }

    #[test]
    fn an_administered_hpv_record_is_vaccinated() {
        let mut evidence = Evidence::new(Programme::Hpv, &[8, 9]);
        evidence.records = vec![vaccination_record(&evidence.patient, Programme::Hpv).build()];
        let generator = evidence.generator(Programme::Hpv);

        assert_eq!(generator.status(), Ok(VaccinationStatus::Vaccinated));
        assert_eq!(generator.latest_session_status(), Ok(None));
        assert_eq!(
            generator.latest_date(),
            Ok(Some(evidence.records[0].performed_on()))
        );
    }

    #[test]
    fn an_already_had_record_is_preferred_and_reported() {
        let mut evidence = Evidence::new(Programme::Hpv, &[8, 9]);
        evidence.records = vec![
            vaccination_record(&evidence.patient, Programme::Hpv).build(),
            vaccination_record(&evidence.patient, Programme::Hpv)
                .outcome(VaccinationOutcome::AlreadyHad)
                .build(),
        ];
        let generator = evidence.generator(Programme::Hpv);

        assert_eq!(generator.status(), Ok(VaccinationStatus::Vaccinated));
        assert_eq!(
            generator.latest_session_status(),
            Ok(Some(LatestSessionStatus::AlreadyHad))
        );
    }

    #[test]
    fn a_flu_record_from_a_previous_year_does_not_count() {
        let mut evidence = Evidence::new(Programme::Flu, &[8, 9]);
        evidence.records = vec![vaccination_record(&evidence.patient, Programme::Flu)
            .academic_year(academic_year().previous())
            .performed_at(Utc.with_ymd_and_hms(2024, 1, 10, 10, 0, 0).single().expect("valid"))
            .build()];
        let generator = evidence.generator(Programme::Flu);

        assert_eq!(generator.status(), Ok(VaccinationStatus::Eligible));
    }

    #[test]
    fn an_hpv_record_from_a_previous_year_does_count() {
        let mut evidence = Evidence::new(Programme::Hpv, &[8, 9]);
        evidence.records = vec![vaccination_record(&evidence.patient, Programme::Hpv)
            .academic_year(academic_year().previous())
            .performed_at(Utc.with_ymd_and_hms(2024, 1, 10, 10, 0, 0).single().expect("valid"))
            .build()];
        let generator = evidence.generator(Programme::Hpv);

        assert_eq!(generator.status(), Ok(VaccinationStatus::Vaccinated));
    }

    #[test]
    fn a_menacwy_dose_before_age_ten_does_not_count() {
        let mut evidence = Evidence::new(Programme::MenAcwy, &[8, 9]);
        // Patient is born 2012-06-15; a dose in 2021 was given at age 8.
        evidence.records = vec![vaccination_record(&evidence.patient, Programme::MenAcwy)
            .academic_year(AcademicYear(2020))
            .performed_at(Utc.with_ymd_and_hms(2021, 3, 1, 10, 0, 0).single().expect("valid"))
            .build()];
        let generator = evidence.generator(Programme::MenAcwy);

        assert_eq!(generator.status(), Ok(VaccinationStatus::Eligible));
    }

    #[test]
    fn a_menacwy_dose_at_age_ten_or_later_counts() {
        let mut evidence = Evidence::new(Programme::MenAcwy, &[8, 9]);
        evidence.records = vec![vaccination_record(&evidence.patient, Programme::MenAcwy)
            .academic_year(AcademicYear(2023))
            .performed_at(Utc.with_ymd_and_hms(2023, 9, 20, 10, 0, 0).single().expect("valid"))
            .build()];
        let generator = evidence.generator(Programme::MenAcwy);

        assert_eq!(generator.status(), Ok(VaccinationStatus::Vaccinated));
    }

    #[test]
    fn td_ipv_needs_the_final_dose_in_the_sequence() {
        let mut evidence = Evidence::new(Programme::TdIpv, &[8, 9]);
        evidence.records = vec![vaccination_record(&evidence.patient, Programme::TdIpv)
            .dose_sequence(1)
            .build()];
        let generator = evidence.generator(Programme::TdIpv);

        assert_eq!(generator.status(), Ok(VaccinationStatus::Eligible));

        let mut completed = Evidence::new(Programme::TdIpv, &[8, 9]);
        completed.records = vec![vaccination_record(&completed.patient, Programme::TdIpv)
            .dose_sequence(5)
            .build()];
        let generator = completed.generator(Programme::TdIpv);

        assert_eq!(generator.status(), Ok(VaccinationStatus::Vaccinated));
        assert_eq!(generator.dose_sequence(), Ok(Some(5)));
    }

    #[test]
    fn td_ipv_accepts_an_unsequenced_dose_recorded_in_the_service() {
        let mut evidence = Evidence::new(Programme::TdIpv, &[8, 9]);
        evidence.records = vec![vaccination_record(&evidence.patient, Programme::TdIpv)
            .no_dose_sequence()
            .recorded_in_service()
            .build()];
        let generator = evidence.generator(Programme::TdIpv);

        assert_eq!(generator.status(), Ok(VaccinationStatus::Vaccinated));
    }

    #[test]
    fn mmr_requires_two_correctly_spaced_doses() {
        let mut evidence = Evidence::new(Programme::Mmr, &[8, 9]);
        let first = Utc.with_ymd_and_hms(2013, 8, 1, 10, 0, 0).single().expect("valid");
        let second = Utc.with_ymd_and_hms(2014, 2, 1, 10, 0, 0).single().expect("valid");
        evidence.records = vec![
            vaccination_record(&evidence.patient, Programme::Mmr)
                .academic_year(AcademicYear(2013))
                .performed_at(second)
                .build(),
            vaccination_record(&evidence.patient, Programme::Mmr)
                .academic_year(AcademicYear(2012))
                .performed_at(first)
                .build(),
        ];
        let generator = evidence.generator(Programme::Mmr);

        assert_eq!(generator.status(), Ok(VaccinationStatus::Vaccinated));
    }

    #[test]
    fn mmr_doses_less_than_four_weeks_apart_leave_the_patient_eligible() {
        let mut evidence = Evidence::new(Programme::Mmr, &[8, 9]);
        let first = Utc.with_ymd_and_hms(2013, 8, 1, 10, 0, 0).single().expect("valid");
        let second = Utc.with_ymd_and_hms(2013, 8, 15, 10, 0, 0).single().expect("valid");
        evidence.records = vec![
            vaccination_record(&evidence.patient, Programme::Mmr)
                .academic_year(AcademicYear(2012))
                .performed_at(second)
                .build(),
            vaccination_record(&evidence.patient, Programme::Mmr)
                .academic_year(AcademicYear(2012))
                .performed_at(first)
                .build(),
        ];
        let generator = evidence.generator(Programme::Mmr);

        assert_eq!(generator.status(), Ok(VaccinationStatus::Eligible));
        // One valid dose so far; the next is the second.
        assert_eq!(generator.dose_sequence(), Ok(Some(2)));
    }

    #[test]
    fn discarded_records_are_ignored() {
        let mut evidence = Evidence::new(Programme::Hpv, &[8, 9]);
        evidence.records =
            vec![vaccination_record(&evidence.patient, Programme::Hpv).discarded().build()];
        let generator = evidence.generator(Programme::Hpv);

        assert_eq!(generator.status(), Ok(VaccinationStatus::Eligible));
    }

    #[test]
    fn a_refused_record_today_surfaces_as_the_latest_session_status() {
        let mut evidence = Evidence::new(Programme::Hpv, &[8, 9]);
        evidence.records = vec![vaccination_record(&evidence.patient, Programme::Hpv)
            .outcome(VaccinationOutcome::Refused)
            .build()];
        let generator = evidence.generator(Programme::Hpv);

        assert_eq!(generator.status(), Ok(VaccinationStatus::Eligible));
        assert_eq!(
            generator.latest_session_status(),
            Ok(Some(LatestSessionStatus::Refused))
        );
    }

    #[test]
    fn a_not_attending_register_entry_reads_as_absent() {
        let evidence = Evidence::new(Programme::Hpv, &[8, 9]);
        let attendance = crate::fixtures::attendance(&evidence.patient, false);
        let generator = VaccinationStatusGenerator::new(
            Programme::Hpv,
            academic_year(),
            &evidence.patient,
            &evidence.locations,
            &evidence.consents,
            &evidence.triages,
            Some(&attendance),
            &evidence.records,
            today(),
        );

        assert_eq!(
            generator.latest_session_status(),
            Ok(Some(LatestSessionStatus::Absent))
        );
        assert_eq!(generator.latest_date(), Ok(Some(attendance.date)));
    }
}
