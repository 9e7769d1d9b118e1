mod config;
mod policy;
mod rules;

pub use config::ScoringConfig;
pub use policy::{applicable_gate, classify, Gate};
pub use rules::{format_amount, RuleKind};

use serde::{Deserialize, Serialize};

use super::domain::{CapabilityProfile, QualificationResult, TenderView};
use crate::workflows::discovery::Tender;

/// Stateless engine applying the scoring rules and gates to tender/profile pairs.
#[derive(Debug, Clone, Default)]
pub struct QualificationEngine {
    config: ScoringConfig,
}

impl QualificationEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, tender: &Tender, profile: &CapabilityProfile) -> ScoreCard {
        let components = rules::score_tender(tender, profile, &self.config);

        let mut card = ScoreCard {
            score: 0,
            passes: Vec::new(),
            issues: Vec::new(),
            components: Vec::with_capacity(components.len()),
        };
        for component in components {
            card.score += component.score;
            if component.satisfied {
                card.passes.push(component.notes.clone());
            } else {
                card.issues.push(component.notes.clone());
            }
            card.components.push(component);
        }
        card
    }

    pub fn evaluate(&self, tender: &Tender, profile: &CapabilityProfile) -> QualificationResult {
        let card = self.score(tender, profile);
        let status = classify(card.score, profile, &self.config);

        QualificationResult {
            tender: TenderView::from(tender),
            score: card.score,
            status,
            passes: card.passes,
            issues: card.issues,
        }
    }

    /// Evaluate every tender, best status first and higher scores first within a status.
    pub fn rank(&self, tenders: &[Tender], profile: &CapabilityProfile) -> Vec<QualificationResult> {
        let mut results: Vec<QualificationResult> = tenders
            .iter()
            .map(|tender| self.evaluate(tender, profile))
            .collect();
        results.sort_by(|a, b| {
            a.status
                .rank()
                .cmp(&b.status.rank())
                .then_with(|| b.score.cmp(&a.score))
        });
        results
    }
}

/// Discrete contribution to a score, kept for audit trails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub rule: RuleKind,
    pub score: i32,
    pub satisfied: bool,
    pub notes: String,
}

impl ScoreComponent {
    pub(crate) fn pass(rule: RuleKind, score: i32, notes: String) -> Self {
        Self {
            rule,
            score,
            satisfied: true,
            notes,
        }
    }

    pub(crate) fn issue(rule: RuleKind, score: i32, notes: String) -> Self {
        Self {
            rule,
            score,
            satisfied: false,
            notes,
        }
    }
}

/// Raw scoring output before classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub score: i32,
    pub passes: Vec<String>,
    pub issues: Vec<String>,
    pub components: Vec<ScoreComponent>,
}
