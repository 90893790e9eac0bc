//! # SVR Core
//!
//! The status generation engine for the school vaccination records service.
//!
//! This crate derives a patient's current status with respect to a
//! vaccination programme from four independent evidence streams: consent
//! responses, clinical triage decisions, vaccination records and session
//! attendance. Each generator is a pure reduction over pre-loaded
//! collections; callers fetch the evidence, construct a generator, and read
//! its status and derived fields.
//!
//! **No storage or API concerns**: persistence of computed statuses,
//! HTTP/gRPC surfaces, notifications and authorisation all belong to the
//! callers. Generators never query storage and never trigger side effects.
//!
//! A generator instance memoises its intermediate results and must only be
//! used for a single evidence snapshot; construct a fresh instance whenever
//! any input collection changes.

pub mod error;
pub mod status;

pub use error::{StatusError, StatusResult};
pub use status::consent::{ConsentStatus, ConsentStatusGenerator};
pub use status::programme::{ProgrammeStatus, ProgrammeStatusGenerator};
pub use status::registration::{RegistrationStatus, RegistrationStatusGenerator};
pub use status::session::{SessionOutcome, SessionOutcomeGenerator};
pub use status::triage::{TriageStatus, TriageStatusGenerator};
pub use status::vaccination::{
    LatestSessionStatus, VaccinationStatus, VaccinationStatusGenerator,
};

#[cfg(test)]
pub(crate) mod fixtures;
