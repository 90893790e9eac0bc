//! Builder-style test data, shared by the generator test modules.
//!
//! Everything is pinned to a fixed clock: "today" is 15 October 2024,
//! mid-way through the 2024 academic year, and the default patient is a
//! year 8 child born 15 June 2012.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use std::collections::HashMap;
use svr_types::{
    AcademicYear, AttendanceRecord, Consent, ConsentResponse, DiseaseType, Location, Patient,
    PatientLocation, Programme, Session, Triage, TriageOutcome, VaccinationOutcome,
    VaccinationRecord, VaccineMethod,
};
use uuid::Uuid;

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 15, 12, 0, 0)
        .single()
        .expect("valid fixture time")
}

pub fn today() -> NaiveDate {
    now().date_naive()
}

pub fn academic_year() -> AcademicYear {
    AcademicYear(2024)
}

pub fn patient() -> Patient {
    Patient {
        id: Uuid::new_v4(),
        given_name: "Sarah".into(),
        family_name: "Williams".into(),
        date_of_birth: NaiveDate::from_ymd_opt(2012, 6, 15).expect("valid fixture date"),
    }
}

/// An enrolment at a location offering one programme to the given year
/// groups, for the current academic year.
pub fn enrolment(patient: &Patient, programme: Programme, year_groups: &[i32]) -> PatientLocation {
    PatientLocation {
        patient_id: patient.id,
        academic_year: academic_year(),
        location: Location {
            id: Uuid::new_v4(),
            name: "Dormer Park School".into(),
            programme_year_groups: HashMap::from([(programme, year_groups.to_vec())]),
        },
    }
}

pub fn session(programmes: &[Programme]) -> Session {
    Session {
        id: Uuid::new_v4(),
        location_id: Uuid::new_v4(),
        academic_year: academic_year(),
        dates: vec![today() - Duration::days(1), today()],
        programmes: programmes.to_vec(),
    }
}

pub fn attendance(patient: &Patient, attending: bool) -> AttendanceRecord {
    AttendanceRecord {
        patient_id: patient.id,
        session_id: Uuid::new_v4(),
        date: today(),
        attending,
    }
}

pub fn attendance_for_session(
    patient: &Patient,
    session: &Session,
    attending: bool,
) -> AttendanceRecord {
    AttendanceRecord {
        patient_id: patient.id,
        session_id: session.id,
        date: today(),
        attending,
    }
}

pub fn consent(patient: &Patient, programme: Programme) -> ConsentBuilder {
    ConsentBuilder {
        consent: Consent {
            id: Uuid::new_v4(),
            patient_id: patient.id,
            programme,
            academic_year: academic_year(),
            response: ConsentResponse::Given,
            responder_name: "Jane Williams".into(),
            via_self_consent: false,
            vaccine_methods: vec![VaccineMethod::Injection],
            disease_types: Vec::new(),
            without_gelatine: false,
            requires_triage: false,
            invalidated: false,
            withdrawn: false,
            submitted_at: now(),
            created_at: now(),
        },
    }
}

pub struct ConsentBuilder {
    consent: Consent,
}

impl ConsentBuilder {
    pub fn given(mut self) -> Self {
        self.consent.response = ConsentResponse::Given;
        self
    }

    pub fn refused(mut self) -> Self {
        self.consent.response = ConsentResponse::Refused;
        self.consent.vaccine_methods = Vec::new();
        self
    }

    pub fn not_provided(mut self) -> Self {
        self.consent.response = ConsentResponse::NotProvided;
        self
    }

    pub fn responder(mut self, name: &str) -> Self {
        self.consent.responder_name = name.into();
        self
    }

    pub fn self_consent(mut self) -> Self {
        self.consent.via_self_consent = true;
        self.consent.responder_name = "Sarah Williams".into();
        self
    }

    pub fn methods(mut self, methods: &[VaccineMethod]) -> Self {
        self.consent.vaccine_methods = methods.to_vec();
        self
    }

    pub fn disease_types(mut self, disease_types: &[DiseaseType]) -> Self {
        self.consent.disease_types = disease_types.to_vec();
        self
    }

    pub fn without_gelatine(mut self) -> Self {
        self.consent.without_gelatine = true;
        self
    }

    pub fn requires_triage(mut self) -> Self {
        self.consent.requires_triage = true;
        self
    }

    pub fn invalidated(mut self) -> Self {
        self.consent.invalidated = true;
        self
    }

    pub fn withdrawn(mut self) -> Self {
        self.consent.withdrawn = true;
        self
    }

    pub fn academic_year(mut self, academic_year: AcademicYear) -> Self {
        self.consent.academic_year = academic_year;
        self
    }

    pub fn submitted_at(mut self, at: DateTime<Utc>) -> Self {
        self.consent.submitted_at = at;
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.consent.created_at = at;
        self
    }

    pub fn build(self) -> Consent {
        self.consent
    }
}

pub fn triage(patient: &Patient, programme: Programme, outcome: TriageOutcome) -> TriageBuilder {
    TriageBuilder {
        triage: Triage {
            id: Uuid::new_v4(),
            patient_id: patient.id,
            programme,
            academic_year: academic_year(),
            outcome,
            vaccine_method: Some(VaccineMethod::Injection),
            without_gelatine: false,
            vaccinate_after: None,
            invalidated: false,
            created_at: now(),
        },
    }
}

pub struct TriageBuilder {
    triage: Triage,
}

impl TriageBuilder {
    pub fn vaccine_method(mut self, method: VaccineMethod) -> Self {
        self.triage.vaccine_method = Some(method);
        self
    }

    pub fn vaccinate_after(mut self, date: NaiveDate) -> Self {
        self.triage.vaccinate_after = Some(date);
        self
    }

    pub fn invalidated(mut self) -> Self {
        self.triage.invalidated = true;
        self
    }

    pub fn academic_year(mut self, academic_year: AcademicYear) -> Self {
        self.triage.academic_year = academic_year;
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.triage.created_at = at;
        self
    }

    pub fn build(self) -> Triage {
        self.triage
    }
}

pub fn vaccination_record(patient: &Patient, programme: Programme) -> VaccinationRecordBuilder {
    VaccinationRecordBuilder {
        record: VaccinationRecord {
            id: Uuid::new_v4(),
            patient_id: patient.id,
            programme,
            academic_year: academic_year(),
            outcome: VaccinationOutcome::Administered,
            dose_sequence: Some(1),
            vaccine_method: Some(VaccineMethod::Injection),
            performed_at: now(),
            session_id: None,
            location_id: Some(Uuid::new_v4()),
            recorded_in_service: false,
            discarded: false,
        },
    }
}

pub struct VaccinationRecordBuilder {
    record: VaccinationRecord,
}

impl VaccinationRecordBuilder {
    pub fn outcome(mut self, outcome: VaccinationOutcome) -> Self {
        self.record.outcome = outcome;
        self
    }

    pub fn dose_sequence(mut self, dose_sequence: u32) -> Self {
        self.record.dose_sequence = Some(dose_sequence);
        self
    }

    pub fn no_dose_sequence(mut self) -> Self {
        self.record.dose_sequence = None;
        self
    }

    pub fn recorded_in_service(mut self) -> Self {
        self.record.recorded_in_service = true;
        self
    }

    pub fn performed_at(mut self, at: DateTime<Utc>) -> Self {
        self.record.performed_at = at;
        self
    }

    pub fn academic_year(mut self, academic_year: AcademicYear) -> Self {
        self.record.academic_year = academic_year;
        self
    }

    pub fn session(mut self, session: &Session) -> Self {
        self.record.session_id = Some(session.id);
        self
    }

    pub fn discarded(mut self) -> Self {
        self.record.discarded = true;
        self
    }

    pub fn build(self) -> VaccinationRecord {
        self.record
    }
}
