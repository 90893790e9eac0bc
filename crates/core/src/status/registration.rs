//! Registration status generation.
//!
//! Whether a patient is present at a session today, and whether their
//! visit is complete. Unlike the academic-year generators this one is
//! infallible: it never consults the dose-selection rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use svr_types::{AttendanceRecord, Patient, Session, VaccinationRecord};

/// A patient's registration position for one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Unknown,
    Attending,
    NotAttending,
    /// Every programme offered by the session has an outcome recorded.
    Completed,
}

/// Generator for [`RegistrationStatus`].
pub struct RegistrationStatusGenerator<'a> {
    session: &'a Session,
    patient: &'a Patient,
    attendance_records: &'a [AttendanceRecord],
    vaccination_records: &'a [VaccinationRecord],
    today: NaiveDate,
}

impl<'a> RegistrationStatusGenerator<'a> {
    pub fn new(
        session: &'a Session,
        patient: &'a Patient,
        attendance_records: &'a [AttendanceRecord],
        vaccination_records: &'a [VaccinationRecord],
        today: NaiveDate,
    ) -> Self {
        Self {
            session,
            patient,
            attendance_records,
            vaccination_records,
            today,
        }
    }

    /// The registration status, always exactly one of the four values.
    pub fn status(&self) -> RegistrationStatus {
        if self.completed() {
            RegistrationStatus::Completed
        } else {
            match self.todays_attendance() {
                Some(attendance) if attendance.attending => RegistrationStatus::Attending,
                Some(_) => RegistrationStatus::NotAttending,
                None => RegistrationStatus::Unknown,
            }
        }
    }

    fn completed(&self) -> bool {
        !self.session.programmes.is_empty()
            && self.session.programmes.iter().all(|programme| {
                self.vaccination_records.iter().any(|record| {
                    record.kept()
                        && record.patient_id == self.patient.id
                        && record.programme == *programme
                        && record.session_id == Some(self.session.id)
                })
            })
    }

    /// Today's register entry for this patient and session, if the session
    /// is held today and the register has been taken.
    fn todays_attendance(&self) -> Option<&'a AttendanceRecord> {
        if !self.session.held_on(self.today) {
            return None;
        }

        self.attendance_records.iter().find(|attendance| {
            attendance.patient_id == self.patient.id
                && attendance.session_id == self.session.id
                && attendance.date == self.today
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{attendance_for_session, patient, session, today, vaccination_record};
    use chrono::Duration;
    use svr_types::Programme;

    struct Evidence {
        patient: Patient,
        session: Session,
        attendances: Vec<AttendanceRecord>,
        records: Vec<VaccinationRecord>,
    }

    impl Evidence {
        fn new(programmes: &[Programme]) -> Self {
            Self {
                patient: patient(),
                session: session(programmes),
                attendances: Vec::new(),
                records: Vec::new(),
            }
        }

        fn status(&self) -> RegistrationStatus {
            RegistrationStatusGenerator::new(
                &self.session,
                &self.patient,
                &self.attendances,
                &self.records,
                today(),
            )
            .status()
        }
    }

    #[test]
    fn no_register_entry_means_unknown() {
        let evidence = Evidence::new(&[Programme::MenAcwy, Programme::TdIpv]);

        assert_eq!(evidence.status(), RegistrationStatus::Unknown);
    }

    #[test]
    fn a_register_entry_for_another_day_means_unknown() {
        let mut evidence = Evidence::new(&[Programme::MenAcwy, Programme::TdIpv]);
        let mut attendance = attendance_for_session(&evidence.patient, &evidence.session, true);
        attendance.date = today() - Duration::days(1);
        evidence.attendances = vec![attendance];

        assert_eq!(evidence.status(), RegistrationStatus::Unknown);
    }

    #[test]
    fn a_present_register_entry_today_means_attending() {
        let mut evidence = Evidence::new(&[Programme::MenAcwy, Programme::TdIpv]);
        evidence.attendances =
            vec![attendance_for_session(&evidence.patient, &evidence.session, true)];

        assert_eq!(evidence.status(), RegistrationStatus::Attending);
    }

    #[test]
    fn an_absent_register_entry_today_means_not_attending() {
        let mut evidence = Evidence::new(&[Programme::MenAcwy, Programme::TdIpv]);
        evidence.attendances =
            vec![attendance_for_session(&evidence.patient, &evidence.session, false)];

        assert_eq!(evidence.status(), RegistrationStatus::NotAttending);
    }

    #[test]
    fn an_outcome_for_only_one_programme_is_not_completed() {
        let mut evidence = Evidence::new(&[Programme::MenAcwy, Programme::TdIpv]);
        evidence.records = vec![vaccination_record(&evidence.patient, Programme::MenAcwy)
            .session(&evidence.session)
            .build()];

        assert_eq!(evidence.status(), RegistrationStatus::Unknown);
    }

    #[test]
    fn outcomes_for_every_programme_mean_completed() {
        let mut evidence = Evidence::new(&[Programme::MenAcwy, Programme::TdIpv]);
        evidence.records = vec![
            vaccination_record(&evidence.patient, Programme::MenAcwy)
                .session(&evidence.session)
                .build(),
            vaccination_record(&evidence.patient, Programme::TdIpv)
                .session(&evidence.session)
                .build(),
        ];

        assert_eq!(evidence.status(), RegistrationStatus::Completed);
    }

    #[test]
    fn completion_outranks_todays_register() {
        let mut evidence = Evidence::new(&[Programme::MenAcwy]);
        evidence.attendances =
            vec![attendance_for_session(&evidence.patient, &evidence.session, true)];
        evidence.records = vec![vaccination_record(&evidence.patient, Programme::MenAcwy)
            .session(&evidence.session)
            .build()];

        assert_eq!(evidence.status(), RegistrationStatus::Completed);
    }
}
