use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AccountId, CapabilityProfile, QualificationResult};

/// Read-only source of contractor profiles keyed by account.
pub trait ProfileStore: Send + Sync {
    fn fetch(&self, account: &AccountId) -> Result<Option<CapabilityProfile>, ProfileStoreError>;
    fn all(&self) -> Result<Vec<CapabilityProfile>, ProfileStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileStoreError {
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook that formats and delivers ranked results to an account.
pub trait NotificationDispatcher: Send + Sync {
    fn dispatch(&self, notification: &QualificationNotification) -> Result<(), DispatchError>;
}

/// Ranked results for one account from one qualification pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualificationNotification {
    pub account_id: AccountId,
    pub generated_at: DateTime<Utc>,
    pub results: Vec<QualificationResult>,
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
