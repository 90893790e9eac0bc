//! Vaccination programmes and their policy flags.
//!
//! A programme identifies a disease/vaccine family and carries the policy
//! the status engine needs: whether evidence is scoped to a single academic
//! year (seasonal), which dose-selection rules apply, and which vaccine
//! delivery methods and disease types it covers.

use serde::{Deserialize, Serialize};

/// A vaccination programme family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Programme {
    /// Seasonal influenza.
    Flu,
    /// Human papillomavirus.
    Hpv,
    /// Meningococcal ACWY.
    MenAcwy,
    /// Tetanus, diphtheria and polio booster.
    TdIpv,
    /// Measles, mumps and rubella (optionally combined with varicella).
    Mmr,
}

/// A disease targeted by one or more programmes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiseaseType {
    Diphtheria,
    Hpv,
    Influenza,
    Measles,
    MeningococcalAcwy,
    Mumps,
    Polio,
    Rubella,
    Tetanus,
    Varicella,
}

impl Programme {
    /// Whether evidence for this programme is scoped to one academic year.
    pub fn seasonal(self) -> bool {
        matches!(self, Self::Flu)
    }

    pub fn flu(self) -> bool {
        matches!(self, Self::Flu)
    }

    pub fn hpv(self) -> bool {
        matches!(self, Self::Hpv)
    }

    pub fn menacwy(self) -> bool {
        matches!(self, Self::MenAcwy)
    }

    pub fn td_ipv(self) -> bool {
        matches!(self, Self::TdIpv)
    }

    pub fn mmr(self) -> bool {
        matches!(self, Self::Mmr)
    }

    /// The adolescent "doubles" programmes delivered together in year 9.
    pub fn doubles(self) -> bool {
        matches!(self, Self::MenAcwy | Self::TdIpv)
    }

    /// Whether the vaccine can be delivered by more than one method.
    pub fn has_multiple_vaccine_methods(self) -> bool {
        matches!(self, Self::Flu)
    }

    /// Whether an administered dose in the patient's history can itself
    /// require clinical triage before any further dose.
    pub fn triage_on_vaccination_history(self) -> bool {
        self.doubles()
    }

    /// Whether a consent response may select a subset of the programme's
    /// disease types (the combined MMRV vaccine).
    pub fn supports_partial_disease_selection(self) -> bool {
        matches!(self, Self::Mmr)
    }

    /// The dose sequence assumed when a record does not carry one.
    pub fn default_dose_sequence(self) -> u32 {
        match self {
            Self::TdIpv => 5,
            _ => 1,
        }
    }

    /// The dose sequence that completes the programme.
    pub fn maximum_dose_sequence(self) -> u32 {
        match self {
            Self::Flu | Self::Hpv | Self::MenAcwy => 1,
            Self::Mmr => 2,
            Self::TdIpv => 5,
        }
    }

    /// The diseases this programme protects against.
    pub fn disease_types(self) -> &'static [DiseaseType] {
        match self {
            Self::Flu => &[DiseaseType::Influenza],
            Self::Hpv => &[DiseaseType::Hpv],
            Self::MenAcwy => &[DiseaseType::MeningococcalAcwy],
            Self::TdIpv => &[
                DiseaseType::Tetanus,
                DiseaseType::Diphtheria,
                DiseaseType::Polio,
            ],
            Self::Mmr => &[
                DiseaseType::Measles,
                DiseaseType::Mumps,
                DiseaseType::Rubella,
                DiseaseType::Varicella,
            ],
        }
    }
}

impl std::fmt::Display for Programme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Flu => "Flu",
            Self::Hpv => "HPV",
            Self::MenAcwy => "MenACWY",
            Self::TdIpv => "Td/IPV",
            Self::Mmr => "MMR",
        };
        write!(f, "{name}")
    }
}
