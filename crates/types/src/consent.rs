//! Consent responses.
//!
//! One record per response from one responding party (a parent, or the
//! patient themselves under Gillick competence). A patient can accumulate
//! several responses per programme; reducing them to a single answer is the
//! consent status generator's job.

use crate::{AcademicYear, DiseaseType, Programme};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a vaccine is delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VaccineMethod {
    Injection,
    Nasal,
}

/// The answer given on a consent response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentResponse {
    Given,
    Refused,
    /// The responder was contacted but did not answer either way.
    NotProvided,
}

/// A single consent response for one patient and programme.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consent {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub programme: Programme,
    pub academic_year: AcademicYear,
    pub response: ConsentResponse,
    /// Identifies the responding party; multiple responses from the same
    /// party are deduplicated to the most recent.
    pub responder_name: String,
    /// Response given directly by the patient rather than a parent.
    pub via_self_consent: bool,
    /// Delivery methods the responder agreed to, in preference order.
    pub vaccine_methods: Vec<VaccineMethod>,
    /// Disease types the responder agreed to, where the programme supports
    /// partial selection. Empty means the programme's full set.
    pub disease_types: Vec<DiseaseType>,
    /// The responder asked for a gelatine-free vaccine.
    pub without_gelatine: bool,
    /// Health answers on the response need clinical follow-up.
    pub requires_triage: bool,
    pub invalidated: bool,
    pub withdrawn: bool,
    pub submitted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Consent {
    pub fn response_given(&self) -> bool {
        self.response == ConsentResponse::Given
    }

    pub fn response_refused(&self) -> bool {
        self.response == ConsentResponse::Refused
    }

    /// Whether this response carries an answer at all.
    pub fn response_provided(&self) -> bool {
        self.response != ConsentResponse::NotProvided
    }

    /// The disease types this response agreed to, defaulting to the
    /// programme's full set when no subset was selected.
    pub fn agreed_disease_types(&self) -> Vec<DiseaseType> {
        if self.disease_types.is_empty() {
            self.programme.disease_types().to_vec()
        } else {
            self.disease_types.clone()
        }
    }
}
