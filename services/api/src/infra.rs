use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tender_sift::error::AppError;
use tender_sift::workflows::qualification::{
    AccountId, CapabilityProfile, DispatchError, NotificationDispatcher, ProfileGuard,
    ProfileStore, ProfileStoreError, ProfileSubmission, QualificationNotification,
    QualificationStatus,
};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Profile store seeded once at startup from a JSON array of submissions.
#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileStore {
    profiles: Arc<Mutex<Vec<CapabilityProfile>>>,
}

impl InMemoryProfileStore {
    pub(crate) fn load(path: &Path) -> Result<Self, AppError> {
        let bytes = std::fs::read(path)?;
        Self::from_json(&bytes)
    }

    pub(crate) fn from_json(bytes: &[u8]) -> Result<Self, AppError> {
        let submissions: Vec<ProfileSubmission> = serde_json::from_slice(bytes)?;
        let profiles = submissions
            .into_iter()
            .map(|submission| ProfileGuard.profile_from_submission(submission))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            profiles: Arc::new(Mutex::new(profiles)),
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.profiles.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn fetch(&self, account: &AccountId) -> Result<Option<CapabilityProfile>, ProfileStoreError> {
        let guard = self
            .profiles
            .lock()
            .map_err(|_| ProfileStoreError::Unavailable("profile mutex poisoned".to_string()))?;
        Ok(guard
            .iter()
            .find(|profile| &profile.account_id == account)
            .cloned())
    }

    fn all(&self) -> Result<Vec<CapabilityProfile>, ProfileStoreError> {
        let guard = self
            .profiles
            .lock()
            .map_err(|_| ProfileStoreError::Unavailable("profile mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }
}

/// Dispatcher that records each notification and logs a digest of it.
#[derive(Default, Clone)]
pub(crate) struct LoggingDispatcher {
    sent: Arc<Mutex<Vec<QualificationNotification>>>,
}

impl NotificationDispatcher for LoggingDispatcher {
    fn dispatch(&self, notification: &QualificationNotification) -> Result<(), DispatchError> {
        let qualified = notification
            .results
            .iter()
            .filter(|result| result.status == QualificationStatus::Qualified)
            .count();
        let top = notification
            .results
            .first()
            .map(|result| result.tender.title.as_str())
            .unwrap_or("-");
        info!(
            account = %notification.account_id,
            tenders = notification.results.len(),
            qualified,
            top,
            "qualification digest ready"
        );

        let mut guard = self
            .sent
            .lock()
            .map_err(|_| DispatchError::Transport("dispatch log poisoned".to_string()))?;
        guard.push(notification.clone());
        Ok(())
    }
}

#[cfg(test)]
impl LoggingDispatcher {
    pub(crate) fn sent(&self) -> Vec<QualificationNotification> {
        self.sent.lock().expect("dispatch mutex poisoned").clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const PROFILES: &str = r#"[
        {
            "accountId": "acct-1",
            "turnover": 400000,
            "publicLiabilityInsurance": 5000000,
            "yearsOfRelevantExperience": 6,
            "hasSafeguardingPolicy": true,
            "hasEnhancedBackgroundChecks": true,
            "hasHealthSafetyPolicy": true,
            "jurisdiction": "Kent"
        },
        {
            "accountId": "acct-2",
            "turnover": 90000,
            "publicLiabilityInsurance": 2000000,
            "yearsOfRelevantExperience": 2,
            "accreditations": ["safecontractor"]
        }
    ]"#;

    #[test]
    fn profile_store_serves_seeded_profiles() {
        let store = InMemoryProfileStore::from_json(PROFILES.as_bytes()).expect("profiles load");

        assert_eq!(store.len(), 2);
        let profile = store
            .fetch(&AccountId("acct-2".to_string()))
            .expect("fetch succeeds")
            .expect("profile present");
        assert!(!profile.has_safeguarding_policy);
        assert!(store
            .fetch(&AccountId("missing".to_string()))
            .expect("fetch succeeds")
            .is_none());
    }

    #[test]
    fn profile_store_rejects_invalid_seed() {
        let error = InMemoryProfileStore::from_json(br#"[{ "accountId": "acct-3" }]"#)
            .err()
            .expect("invalid seed rejected");
        assert!(error.to_string().contains("turnover"));
    }

    #[test]
    fn logging_dispatcher_records_notifications() {
        let dispatcher = LoggingDispatcher::default();
        let notification = QualificationNotification {
            account_id: AccountId("acct-1".to_string()),
            generated_at: Utc.with_ymd_and_hms(2025, 11, 3, 9, 0, 0).unwrap(),
            results: Vec::new(),
        };

        dispatcher.dispatch(&notification).expect("dispatch succeeds");

        assert_eq!(dispatcher.sent(), vec![notification]);
    }
}
