use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{
    AccountId, CapabilityProfile, ProfileSubmission, QualificationResult, QualificationStatus,
};
use super::evaluation::{QualificationEngine, ScoringConfig};
use super::profile::{ProfileError, ProfileGuard};
use super::repository::{
    NotificationDispatcher, ProfileStore, ProfileStoreError, QualificationNotification,
};
use crate::workflows::discovery::{DiscoveryReport, DiscoveryStats, NoticeDiscovery, NoticeSource};

/// Service composing notice discovery, the profile store, scoring, and notification.
pub struct QualificationService<S, P, D> {
    guard: ProfileGuard,
    discovery: Arc<NoticeDiscovery<S>>,
    profiles: Arc<P>,
    dispatcher: Arc<D>,
    engine: Arc<QualificationEngine>,
}

/// Accounts to include in a pass; empty means every stored profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassRequest {
    #[serde(default)]
    pub accounts: Vec<AccountId>,
}

/// Ranked results for an ad-hoc profile submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub account_id: AccountId,
    pub generated_at: DateTime<Utc>,
    pub discovery: DiscoveryStats,
    pub results: Vec<QualificationResult>,
}

/// Per-account tally of a qualification pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountOutcome {
    pub account_id: AccountId,
    pub qualified: usize,
    pub conditional: usize,
    pub disqualified: usize,
    pub dispatched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispatch_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassSummary {
    pub generated_at: DateTime<Utc>,
    pub discovery: DiscoveryStats,
    pub accounts: Vec<AccountOutcome>,
    pub unknown_accounts: Vec<AccountId>,
    pub failed_dispatches: usize,
}

impl<S, P, D> QualificationService<S, P, D>
where
    S: NoticeSource + 'static,
    P: ProfileStore + 'static,
    D: NotificationDispatcher + 'static,
{
    pub fn new(
        discovery: NoticeDiscovery<S>,
        profiles: Arc<P>,
        dispatcher: Arc<D>,
        config: ScoringConfig,
    ) -> Self {
        Self {
            guard: ProfileGuard,
            discovery: Arc::new(discovery),
            profiles,
            dispatcher,
            engine: Arc::new(QualificationEngine::new(config)),
        }
    }

    pub fn discovery(&self) -> &NoticeDiscovery<S> {
        &self.discovery
    }

    pub fn engine(&self) -> &QualificationEngine {
        &self.engine
    }

    pub async fn discover(&self, now: DateTime<Utc>) -> DiscoveryReport {
        self.discovery.discover(now).await
    }

    /// Validate a submitted profile, then rank the currently open tenders against it.
    pub async fn evaluate(
        &self,
        submission: ProfileSubmission,
        now: DateTime<Utc>,
    ) -> Result<Evaluation, QualificationServiceError> {
        let profile = self.guard.profile_from_submission(submission)?;
        let report = self.discover(now).await;
        let results = self.engine.rank(&report.tenders, &profile);

        Ok(Evaluation {
            account_id: profile.account_id,
            generated_at: now,
            discovery: report.stats,
            results,
        })
    }

    /// Run one qualification pass. Safe to repeat: nothing is persisted between passes.
    pub async fn run_pass(
        &self,
        request: &PassRequest,
        now: DateTime<Utc>,
    ) -> Result<PassSummary, QualificationServiceError> {
        let (profiles, unknown_accounts) = self.resolve_profiles(&request.accounts)?;
        let report = self.discover(now).await;

        let mut summary = PassSummary {
            generated_at: now,
            discovery: report.stats,
            accounts: Vec::with_capacity(profiles.len()),
            unknown_accounts,
            failed_dispatches: 0,
        };

        for profile in profiles {
            let results = self.engine.rank(&report.tenders, &profile);
            let mut outcome = tally(&profile.account_id, &results);

            if !results.is_empty() {
                let notification = QualificationNotification {
                    account_id: profile.account_id.clone(),
                    generated_at: now,
                    results,
                };
                match self.dispatcher.dispatch(&notification) {
                    Ok(()) => outcome.dispatched = true,
                    Err(error) => {
                        warn!(account = %profile.account_id, %error, "notification dispatch failed");
                        summary.failed_dispatches += 1;
                        outcome.dispatch_error = Some(error.to_string());
                    }
                }
            }

            info!(
                account = %outcome.account_id,
                qualified = outcome.qualified,
                conditional = outcome.conditional,
                disqualified = outcome.disqualified,
                dispatched = outcome.dispatched,
                "qualification pass scored account"
            );
            summary.accounts.push(outcome);
        }

        Ok(summary)
    }

    fn resolve_profiles(
        &self,
        accounts: &[AccountId],
    ) -> Result<(Vec<CapabilityProfile>, Vec<AccountId>), QualificationServiceError> {
        if accounts.is_empty() {
            return Ok((self.profiles.all()?, Vec::new()));
        }

        let mut profiles = Vec::with_capacity(accounts.len());
        let mut unknown = Vec::new();
        for account in accounts {
            match self.profiles.fetch(account)? {
                Some(profile) => profiles.push(profile),
                None => {
                    warn!(%account, "no capability profile stored for account");
                    unknown.push(account.clone());
                }
            }
        }
        Ok((profiles, unknown))
    }
}

fn tally(account: &AccountId, results: &[QualificationResult]) -> AccountOutcome {
    let mut outcome = AccountOutcome {
        account_id: account.clone(),
        ..AccountOutcome::default()
    };
    for result in results {
        match result.status {
            QualificationStatus::Qualified => outcome.qualified += 1,
            QualificationStatus::Conditional => outcome.conditional += 1,
            QualificationStatus::Disqualified => outcome.disqualified += 1,
        }
    }
    outcome
}

/// Error raised by the qualification service.
#[derive(Debug, thiserror::Error)]
pub enum QualificationServiceError {
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Store(#[from] ProfileStoreError),
}

impl QualificationServiceError {
    /// True when the request itself was unusable rather than a collaborator failing.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, QualificationServiceError::Profile(_))
    }
}
