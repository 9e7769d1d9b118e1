use serde::{Deserialize, Serialize};

use super::super::domain::{CapabilityProfile, QualificationStatus};
use super::config::ScoringConfig;

/// Gate that overrode score thresholding for a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gate", rename_all = "snake_case")]
pub enum Gate {
    InsufficientInsurance { required: f64, actual: f64 },
    InsufficientExperience { required: f64, actual: f64 },
    MissingPolicies { policies: Vec<String> },
}

impl Gate {
    pub fn is_hard(&self) -> bool {
        !matches!(self, Gate::MissingPolicies { .. })
    }

    pub fn summary(&self) -> String {
        match self {
            Gate::InsufficientInsurance { required, actual } => format!(
                "disqualified: public liability cover {actual:.0} below required {required:.0}"
            ),
            Gate::InsufficientExperience { required, actual } => format!(
                "disqualified: {actual} years of experience below required {required}"
            ),
            Gate::MissingPolicies { policies } => {
                format!("capped at conditional: missing {}", policies.join(", "))
            }
        }
    }
}

/// First gate that applies to the profile, hard gates before soft.
pub fn applicable_gate(profile: &CapabilityProfile, config: &ScoringConfig) -> Option<Gate> {
    if profile.public_liability_insurance < config.minimum_public_liability {
        return Some(Gate::InsufficientInsurance {
            required: config.minimum_public_liability,
            actual: profile.public_liability_insurance,
        });
    }

    if profile.years_of_relevant_experience < config.minimum_experience_years {
        return Some(Gate::InsufficientExperience {
            required: config.minimum_experience_years,
            actual: profile.years_of_relevant_experience,
        });
    }

    let missing = profile.missing_policies();
    if !missing.is_empty() {
        return Some(Gate::MissingPolicies {
            policies: missing.into_iter().map(str::to_string).collect(),
        });
    }

    None
}

/// Map a score to a status. Hard gates disqualify and soft gates cap at conditional.
pub fn classify(
    score: i32,
    profile: &CapabilityProfile,
    config: &ScoringConfig,
) -> QualificationStatus {
    match applicable_gate(profile, config) {
        Some(gate) if gate.is_hard() => QualificationStatus::Disqualified,
        Some(_) => QualificationStatus::Conditional,
        None if score >= config.qualified_threshold => QualificationStatus::Qualified,
        None if score >= config.conditional_threshold => QualificationStatus::Conditional,
        None => QualificationStatus::Disqualified,
    }
}
