//! # SVR Types
//!
//! Domain value types for the school vaccination records status engine.
//!
//! This crate defines the evidence records the engine consumes but does not
//! own: consents, triage decisions, vaccination records, attendance, and the
//! patient/programme/location entities they are scoped by. Everything here is
//! a plain immutable value; loading, persistence and access control belong
//! to the callers that assemble these collections.

pub mod academic_year;
pub mod attendance;
pub mod consent;
pub mod location;
pub mod patient;
pub mod programme;
pub mod session;
pub mod triage;
pub mod vaccination_record;

pub use academic_year::AcademicYear;
pub use attendance::AttendanceRecord;
pub use consent::{Consent, ConsentResponse, VaccineMethod};
pub use location::{Location, PatientLocation};
pub use patient::Patient;
pub use programme::{DiseaseType, Programme};
pub use session::Session;
pub use triage::{Triage, TriageOutcome};
pub use vaccination_record::{VaccinationOutcome, VaccinationRecord};
