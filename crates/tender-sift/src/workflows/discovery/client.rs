use async_trait::async_trait;
use tracing::debug;

use super::domain::NoticeQuery;
use super::parser::{parse_search_response, RawRelease};
use crate::config::SourceConfig;

const SEARCH_PATH: &str = "/Published/Notices/OCDS/Search";
const USER_AGENT: &str = concat!("tender-sift/", env!("CARGO_PKG_VERSION"));

/// Failure of a single jurisdiction query. Always recoverable at the discovery level.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("notice search timed out")]
    Timeout,
    #[error("notice search request failed: {0}")]
    Http(reqwest::Error),
    #[error("notice search returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("notice search response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

/// Upstream notice search, one call per jurisdiction.
#[async_trait]
pub trait NoticeSource: Send + Sync {
    async fn search(&self, query: &NoticeQuery) -> Result<Vec<RawRelease>, SourceError>;
}

/// Client for the public OCDS notice search endpoint.
#[derive(Debug, Clone)]
pub struct ContractsFinderClient {
    client: reqwest::Client,
    search_url: String,
}

impl ContractsFinderClient {
    pub fn new(config: &SourceConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self::with_client(client, &config.api_base))
    }

    pub fn with_client(client: reqwest::Client, api_base: &str) -> Self {
        Self {
            client,
            search_url: format!("{}{}", api_base.trim_end_matches('/'), SEARCH_PATH),
        }
    }
}

#[async_trait]
impl NoticeSource for ContractsFinderClient {
    async fn search(&self, query: &NoticeQuery) -> Result<Vec<RawRelease>, SourceError> {
        let published_from = query.published_since.format("%Y-%m-%d").to_string();
        let limit = query.limit.to_string();

        let resp = self
            .client
            .get(&self.search_url)
            .query(&[
                ("keyword", query.keywords.as_str()),
                ("location", query.jurisdiction.as_str()),
                ("publishedFrom", published_from.as_str()),
                ("size", limit.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().await?;
        let parsed = parse_search_response(&body)?;
        if parsed.malformed > 0 {
            debug!(
                jurisdiction = %query.jurisdiction,
                malformed = parsed.malformed,
                "skipped malformed releases"
            );
        }

        Ok(parsed.releases)
    }
}
