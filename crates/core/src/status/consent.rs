//! Consent status generation.
//!
//! Reduces a patient's consent responses for one programme and academic
//! year to a single answer. Responses are deduplicated per responding party
//! (keeping the most recently submitted), and a response given by the
//! patient themselves takes exclusive precedence over parental responses.

use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use svr_types::{AcademicYear, Consent, DiseaseType, Patient, Programme, VaccineMethod};
use uuid::Uuid;

/// The reduced consent position for one patient, programme and academic
/// year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentStatus {
    NoResponse,
    Given,
    Refused,
    /// Responders disagree: mixed answers, no common delivery method, or
    /// differing disease-type selections.
    Conflicts,
}

/// Generator for [`ConsentStatus`] and its derived attributes.
///
/// The `consents` collection is expected to be sorted in reverse
/// chronological order, meaning the most recent response is at the
/// beginning of the slice.
pub struct ConsentStatusGenerator<'a> {
    programme: Programme,
    academic_year: AcademicYear,
    patient_id: Uuid,
    consents: &'a [Consent],
    latest_consents: OnceCell<Vec<&'a Consent>>,
}

impl<'a> ConsentStatusGenerator<'a> {
    pub fn new(
        programme: Programme,
        academic_year: AcademicYear,
        patient: &'a Patient,
        consents: &'a [Consent],
    ) -> Self {
        Self {
            programme,
            academic_year,
            patient_id: patient.id,
            consents,
            latest_consents: OnceCell::new(),
        }
    }

    /// The consent status, always exactly one of the four values.
    ///
    /// Absence of evidence degrades to [`ConsentStatus::NoResponse`]; this
    /// never fails.
    pub fn status(&self) -> ConsentStatus {
        if self.should_be_given() {
            ConsentStatus::Given
        } else if self.should_be_refused() {
            ConsentStatus::Refused
        } else if self.should_be_conflicts() {
            ConsentStatus::Conflicts
        } else {
            ConsentStatus::NoResponse
        }
    }

    /// The delivery methods every responder agreed to, in the most recent
    /// responder's preference order. Empty unless the status is
    /// [`ConsentStatus::Given`].
    pub fn vaccine_methods(&self) -> Vec<VaccineMethod> {
        if self.status() == ConsentStatus::Given {
            self.vaccine_method_intersection()
        } else {
            Vec::new()
        }
    }

    /// The disease types every responder agreed to, sorted. Empty unless
    /// the status is [`ConsentStatus::Given`].
    pub fn disease_types(&self) -> Vec<DiseaseType> {
        if self.status() != ConsentStatus::Given {
            return Vec::new();
        }

        let mut intersection: Option<Vec<DiseaseType>> = None;
        for consent in self.latest_consents() {
            let agreed = consent.agreed_disease_types();
            intersection = Some(match intersection {
                Some(current) => current
                    .into_iter()
                    .filter(|disease_type| agreed.contains(disease_type))
                    .collect(),
                None => agreed,
            });
        }

        let mut disease_types = intersection.unwrap_or_default();
        disease_types.sort();
        disease_types
    }

    /// Whether any responder asked for a gelatine-free vaccine. Always
    /// false unless the status is [`ConsentStatus::Given`].
    pub fn without_gelatine(&self) -> bool {
        self.status() == ConsentStatus::Given
            && self.latest_consents().iter().any(|c| c.without_gelatine)
    }

    /// Whether any surviving response flagged health answers needing
    /// clinical follow-up.
    pub fn requires_triage(&self) -> bool {
        self.latest_consents().iter().any(|c| c.requires_triage)
    }

    fn should_be_given(&self) -> bool {
        let latest = self.latest_consents();

        !latest.is_empty()
            && latest.iter().all(|c| c.response_given())
            && !self.vaccine_method_intersection().is_empty()
            && !self.conflicting_disease_types()
    }

    fn should_be_refused(&self) -> bool {
        let latest = self.latest_consents();

        !latest.is_empty() && latest.iter().all(|c| c.response_refused())
    }

    fn should_be_conflicts(&self) -> bool {
        let latest = self.latest_consents();

        let any_given = latest.iter().any(|c| c.response_given());
        let any_refused = latest.iter().any(|c| c.response_refused());

        (any_given && any_refused)
            || (!latest.is_empty()
                && latest.iter().all(|c| c.response_given())
                && self.vaccine_method_intersection().is_empty())
            || (any_given && self.conflicting_disease_types())
    }

    /// Responses from each distinct responding party, reduced to the most
    /// recently submitted per party, with self-consent taking exclusive
    /// precedence.
    fn latest_consents(&self) -> &[&'a Consent] {
        self.latest_consents.get_or_init(|| {
            let mut latest_by_responder: Vec<&'a Consent> = Vec::new();

            for consent in self.consents.iter().filter(|c| self.in_scope(c)) {
                match latest_by_responder
                    .iter_mut()
                    .find(|existing| existing.responder_name == consent.responder_name)
                {
                    Some(existing) => {
                        let newer = (consent.submitted_at, consent.created_at)
                            > (existing.submitted_at, existing.created_at);
                        if newer {
                            *existing = consent;
                        }
                    }
                    None => latest_by_responder.push(consent),
                }
            }

            // Self consents take exclusive precedence over parental ones.
            if latest_by_responder.iter().any(|c| c.via_self_consent) {
                latest_by_responder.retain(|c| c.via_self_consent);
            }

            latest_by_responder
                .sort_by(|a, b| (b.submitted_at, b.created_at).cmp(&(a.submitted_at, a.created_at)));
            latest_by_responder
        })
    }

    fn in_scope(&self, consent: &Consent) -> bool {
        consent.patient_id == self.patient_id
            && consent.programme == self.programme
            && consent.academic_year == self.academic_year
            && !consent.invalidated
            && !consent.withdrawn
            && consent.response_provided()
    }

    /// Methods agreed by every surviving responder, preserving the most
    /// recent responder's preference order.
    fn vaccine_method_intersection(&self) -> Vec<VaccineMethod> {
        let latest = self.latest_consents();

        let Some((first, rest)) = latest.split_first() else {
            return Vec::new();
        };

        first
            .vaccine_methods
            .iter()
            .filter(|method| rest.iter().all(|c| c.vaccine_methods.contains(method)))
            .copied()
            .collect()
    }

    fn conflicting_disease_types(&self) -> bool {
        if !self.programme.supports_partial_disease_selection() {
            return false;
        }

        let mut selections = self
            .latest_consents()
            .iter()
            .filter(|c| c.response_given())
            .map(|c| {
                let mut agreed = c.agreed_disease_types();
                agreed.sort();
                agreed
            });

        match selections.next() {
            Some(first) => selections.any(|selection| selection != first),
            None => false,
        }
    }
}
