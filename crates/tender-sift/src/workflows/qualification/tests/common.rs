use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use crate::config::SourceConfig;
use crate::workflows::discovery::{
    NoticeDiscovery, NoticeQuery, NoticeSource, RawRelease, RelevanceConfig, SourceError, Tender,
};
use crate::workflows::qualification::domain::{
    AccountId, CapabilityProfile, ProfileSubmission,
};
use crate::workflows::qualification::repository::{
    DispatchError, NotificationDispatcher, ProfileStore, ProfileStoreError,
    QualificationNotification,
};
use crate::workflows::qualification::{QualificationService, ScoringConfig};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 3, 9, 0, 0).unwrap()
}

pub(super) fn tender(id: &str, value: Option<f64>) -> Tender {
    Tender {
        id: id.to_string(),
        title: "Stairlift installation framework".to_string(),
        description: "Supply and installation of stairlifts".to_string(),
        buyer: "Kent County Council".to_string(),
        value,
        deadline: Some("2025-12-01T12:00:00Z".to_string()),
        jurisdiction: "Kent".to_string(),
        url: format!("https://notices.example.gov.uk/Notice/{id}"),
    }
}

/// Fully compliant profile that does not operate in Kent.
pub(super) fn profile(account: &str) -> CapabilityProfile {
    CapabilityProfile {
        account_id: AccountId(account.to_string()),
        turnover: 400_000.0,
        public_liability_insurance: 5_000_000.0,
        years_of_relevant_experience: 6.0,
        has_safeguarding_policy: true,
        has_enhanced_background_checks: true,
        has_health_safety_policy: true,
        accreditations: BTreeSet::new(),
        jurisdiction: "Manchester".to_string(),
    }
}

pub(super) fn submission() -> ProfileSubmission {
    ProfileSubmission {
        account_id: Some("acct-adhoc".to_string()),
        turnover: Some(400_000.0),
        public_liability_insurance: Some(5_000_000.0),
        years_of_relevant_experience: Some(6.0),
        has_safeguarding_policy: Some(true),
        has_enhanced_background_checks: Some(true),
        has_health_safety_policy: Some(true),
        accreditations: Vec::new(),
        jurisdiction: Some("Guildford, Surrey".to_string()),
    }
}

pub(super) fn missing_insurance_submission() -> ProfileSubmission {
    ProfileSubmission {
        public_liability_insurance: None,
        ..submission()
    }
}

fn release(value: Value) -> RawRelease {
    serde_json::from_value(value).expect("release fixture")
}

/// Notice source with canned releases for Kent and Surrey.
///
/// Both jurisdictions list the stairlift framework, so it is a duplicate once merged.
#[derive(Default)]
pub(super) struct CannedSource {
    pub calls: AtomicUsize,
}

#[async_trait]
impl NoticeSource for CannedSource {
    async fn search(&self, query: &NoticeQuery) -> Result<Vec<RawRelease>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let stairlift = json!({
            "ocid": "ocds-b5fd17-stair-1",
            "tender": {
                "title": "Stairlift installation framework",
                "description": "Supply and installation of stairlifts",
                "value": { "amount": 100000, "currency": "GBP" },
                "tenderPeriod": { "endDate": "2099-12-01T12:00:00Z" }
            },
            "buyer": { "name": "Kent County Council" }
        });

        let releases = match query.jurisdiction.as_str() {
            "Kent" => vec![
                release(stairlift),
                release(json!({
                    "ocid": "ocds-b5fd17-closed",
                    "tender": {
                        "title": "Wet room adaptations",
                        "tenderPeriod": { "endDate": "2020-01-01T00:00:00Z" }
                    }
                })),
            ],
            "Surrey" => vec![
                release(stairlift),
                release(json!({
                    "ocid": "ocds-b5fd17-wet-2",
                    "tender": {
                        "title": "Wet room adaptation works",
                        "value": { "amount": 2000000 },
                        "tenderPeriod": { "endDate": "2099-11-01" }
                    },
                    "buyer": { "name": "Surrey County Council" }
                })),
            ],
            _ => Vec::new(),
        };
        Ok(releases)
    }
}

pub(super) fn discovery() -> NoticeDiscovery<CannedSource> {
    let config = SourceConfig {
        attempts: 1,
        backoff: std::time::Duration::ZERO,
        jurisdictions: vec!["Kent".to_string(), "Surrey".to_string()],
        ..SourceConfig::default()
    };
    NoticeDiscovery::new(CannedSource::default(), config, &RelevanceConfig::default())
}

#[derive(Default)]
pub(super) struct MemoryProfiles {
    profiles: Mutex<Vec<CapabilityProfile>>,
}

impl MemoryProfiles {
    pub(super) fn with(profiles: Vec<CapabilityProfile>) -> Self {
        Self {
            profiles: Mutex::new(profiles),
        }
    }
}

impl ProfileStore for MemoryProfiles {
    fn fetch(&self, account: &AccountId) -> Result<Option<CapabilityProfile>, ProfileStoreError> {
        let profiles = self.profiles.lock().expect("profiles mutex poisoned");
        Ok(profiles
            .iter()
            .find(|profile| &profile.account_id == account)
            .cloned())
    }

    fn all(&self) -> Result<Vec<CapabilityProfile>, ProfileStoreError> {
        Ok(self.profiles.lock().expect("profiles mutex poisoned").clone())
    }
}

pub(super) struct UnavailableProfiles;

impl ProfileStore for UnavailableProfiles {
    fn fetch(&self, _account: &AccountId) -> Result<Option<CapabilityProfile>, ProfileStoreError> {
        Err(ProfileStoreError::Unavailable("maintenance".to_string()))
    }

    fn all(&self) -> Result<Vec<CapabilityProfile>, ProfileStoreError> {
        Err(ProfileStoreError::Unavailable("maintenance".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryDispatcher {
    pub sent: Mutex<Vec<QualificationNotification>>,
}

impl NotificationDispatcher for MemoryDispatcher {
    fn dispatch(&self, notification: &QualificationNotification) -> Result<(), DispatchError> {
        self.sent
            .lock()
            .expect("dispatcher mutex poisoned")
            .push(notification.clone());
        Ok(())
    }
}

pub(super) struct FailingDispatcher;

impl NotificationDispatcher for FailingDispatcher {
    fn dispatch(&self, _notification: &QualificationNotification) -> Result<(), DispatchError> {
        Err(DispatchError::Transport("smtp offline".to_string()))
    }
}

pub(super) type TestService = QualificationService<CannedSource, MemoryProfiles, MemoryDispatcher>;

pub(super) fn build_service(
    profiles: Vec<CapabilityProfile>,
) -> (Arc<TestService>, Arc<MemoryDispatcher>) {
    let dispatcher = Arc::new(MemoryDispatcher::default());
    let service = QualificationService::new(
        discovery(),
        Arc::new(MemoryProfiles::with(profiles)),
        dispatcher.clone(),
        ScoringConfig::default(),
    );
    (Arc::new(service), dispatcher)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}
