//! Notice discovery: per-jurisdiction fetch, normalization, deduplication,
//! relevance and deadline screening.

mod client;
mod deadline;
mod dedup;
mod domain;
mod normalizer;
mod parser;
mod relevance;

pub use client::{ContractsFinderClient, NoticeSource, SourceError};
pub use deadline::{is_open, parse_deadline};
pub use dedup::dedupe;
pub use domain::{NoticeQuery, Tender};
pub use normalizer::{normalize, NoticeLinks};
pub use parser::{
    parse_search_response, ParsedReleases, RawParty, RawPeriod, RawRelease, RawTender, RawValue,
};
pub use relevance::{Relevance, RelevanceClassifier, RelevanceConfig, RelevanceMode};

use chrono::{DateTime, TimeDelta, Utc};
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{SourceConfig, MAX_LOOKBACK_DAYS};

/// Releases returned for one jurisdiction, in the order the source returned them.
#[derive(Debug, Clone, Default)]
pub struct JurisdictionBatch {
    pub jurisdiction: String,
    pub releases: Vec<RawRelease>,
    pub source_failed: bool,
}

/// Counters describing where records were dropped during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryStats {
    pub jurisdictions: usize,
    pub failed_sources: usize,
    pub fetched: usize,
    pub unidentified: usize,
    pub duplicates: usize,
    pub irrelevant: usize,
    pub closed: usize,
    pub retained: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoveryReport {
    pub tenders: Vec<Tender>,
    pub stats: DiscoveryStats,
}

/// Screen already-fetched batches: normalize, dedupe, then keep relevant open tenders.
///
/// `batches` must be in jurisdiction-list order; the first sighting of an id wins.
pub fn screen(
    batches: Vec<JurisdictionBatch>,
    links: &NoticeLinks,
    classifier: &RelevanceClassifier,
    now: DateTime<Utc>,
) -> DiscoveryReport {
    let mut stats = DiscoveryStats {
        jurisdictions: batches.len(),
        ..DiscoveryStats::default()
    };

    let mut normalized = Vec::new();
    for batch in batches {
        if batch.source_failed {
            stats.failed_sources += 1;
        }
        stats.fetched += batch.releases.len();

        for release in batch.releases {
            match normalize(release, &batch.jurisdiction, links) {
                Some(tender) => normalized.push(tender),
                None => stats.unidentified += 1,
            }
        }
    }

    let merged = normalized.len();
    let unique = dedupe(normalized);
    stats.duplicates = merged - unique.len();

    let mut tenders = Vec::with_capacity(unique.len());
    for tender in unique {
        let verdict = classifier.classify(&tender);
        if !verdict.is_relevant() {
            debug!(id = %tender.id, ?verdict, "dropped irrelevant tender");
            stats.irrelevant += 1;
            continue;
        }

        if !is_open(&tender, now) {
            debug!(id = %tender.id, deadline = ?tender.deadline, "dropped closed or undated tender");
            stats.closed += 1;
            continue;
        }

        tenders.push(tender);
    }

    stats.retained = tenders.len();
    DiscoveryReport { tenders, stats }
}

/// Runs the configured jurisdiction queries against a [`NoticeSource`].
pub struct NoticeDiscovery<S> {
    source: S,
    config: SourceConfig,
    classifier: RelevanceClassifier,
    links: NoticeLinks,
}

impl<S> NoticeDiscovery<S>
where
    S: NoticeSource,
{
    pub fn new(source: S, config: SourceConfig, relevance: &RelevanceConfig) -> Self {
        let links = NoticeLinks::new(config.notice_base.clone());
        Self {
            source,
            config,
            classifier: RelevanceClassifier::new(relevance),
            links,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn jurisdictions(&self) -> &[String] {
        &self.config.jurisdictions
    }

    /// The publication window is clamped to [`MAX_LOOKBACK_DAYS`]; a window
    /// reaching past the calendar's start falls back to today.
    pub fn query_for(&self, jurisdiction: &str, now: DateTime<Utc>) -> NoticeQuery {
        let today = now.date_naive();
        let lookback = self.config.lookback_days.min(MAX_LOOKBACK_DAYS);
        let published_since = TimeDelta::try_days(i64::from(lookback))
            .and_then(|window| today.checked_sub_signed(window))
            .unwrap_or(today);

        NoticeQuery {
            jurisdiction: jurisdiction.to_string(),
            keywords: self.classifier.query_string(),
            published_since,
            limit: self.config.result_limit,
        }
    }

    /// Query every jurisdiction concurrently; results come back in jurisdiction-list order.
    pub async fn fetch_all(&self, now: DateTime<Utc>) -> Vec<JurisdictionBatch> {
        let fetches = self
            .config
            .jurisdictions
            .iter()
            .map(|jurisdiction| self.fetch_jurisdiction(jurisdiction, now));
        join_all(fetches).await
    }

    pub async fn discover(&self, now: DateTime<Utc>) -> DiscoveryReport {
        let batches = self.fetch_all(now).await;
        let report = screen(batches, &self.links, &self.classifier, now);

        let stats = &report.stats;
        info!(
            jurisdictions = stats.jurisdictions,
            failed_sources = stats.failed_sources,
            fetched = stats.fetched,
            duplicates = stats.duplicates,
            irrelevant = stats.irrelevant,
            closed = stats.closed,
            retained = stats.retained,
            "notice discovery complete"
        );

        report
    }

    async fn fetch_jurisdiction(&self, jurisdiction: &str, now: DateTime<Utc>) -> JurisdictionBatch {
        let query = self.query_for(jurisdiction, now);
        let attempts = self.config.attempts.max(1);

        for attempt in 1..=attempts {
            let outcome =
                match tokio::time::timeout(self.config.timeout, self.source.search(&query)).await {
                    Ok(result) => result,
                    Err(_) => Err(SourceError::Timeout),
                };

            match outcome {
                Ok(releases) => {
                    debug!(jurisdiction, count = releases.len(), "fetched releases");
                    return JurisdictionBatch {
                        jurisdiction: jurisdiction.to_string(),
                        releases,
                        source_failed: false,
                    };
                }
                Err(error) => {
                    warn!(jurisdiction, attempt, attempts, %error, "notice search failed");
                    if attempt < attempts {
                        tokio::time::sleep(retry_delay(self.config.backoff, attempt)).await;
                    }
                }
            }
        }

        JurisdictionBatch {
            jurisdiction: jurisdiction.to_string(),
            releases: Vec::new(),
            source_failed: true,
        }
    }
}

/// Linear backoff before retry `attempt + 1`.
fn retry_delay(backoff: std::time::Duration, attempt: u32) -> std::time::Duration {
    backoff.saturating_mul(attempt)
}
