use serde::{Deserialize, Serialize};

/// Gate and threshold settings shared by the scoring rules and the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    /// Public liability cover required both for the insurance rule and the hard gate.
    pub minimum_public_liability: f64,
    /// Experience below this many years is a hard disqualifier.
    pub minimum_experience_years: f64,
    pub qualified_threshold: i32,
    pub conditional_threshold: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            minimum_public_liability: 5_000_000.0,
            minimum_experience_years: 1.0,
            qualified_threshold: 25,
            conditional_threshold: 15,
        }
    }
}
