//! Contractor qualification: profile validation, scoring, gating, and ranked
//! notification of open tenders per account.

pub mod domain;
pub(crate) mod evaluation;
pub(crate) mod profile;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AccountId, Accreditation, CapabilityProfile, ProfileSubmission, QualificationResult,
    QualificationStatus, TenderView,
};
pub use evaluation::{
    applicable_gate, classify, format_amount, Gate, QualificationEngine, RuleKind, ScoreCard,
    ScoreComponent, ScoringConfig,
};
pub use profile::{ProfileError, ProfileGuard};
pub use repository::{
    DispatchError, NotificationDispatcher, ProfileStore, ProfileStoreError,
    QualificationNotification,
};
pub use router::qualification_router;
pub use service::{
    AccountOutcome, Evaluation, PassRequest, PassSummary, QualificationService,
    QualificationServiceError,
};
