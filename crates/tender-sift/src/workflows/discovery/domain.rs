use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical procurement notice produced by the normalizer.
///
/// Tenders are never mutated after normalization; screening stages either keep
/// a tender as-is or drop it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tender {
    pub id: String,
    pub title: String,
    pub description: String,
    pub buyer: String,
    pub value: Option<f64>,
    pub deadline: Option<String>,
    pub jurisdiction: String,
    pub url: String,
}

impl Tender {
    /// Lower-cased title and description, the text relevance keywords match against.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }
}

/// Parameters for a single jurisdiction query against the upstream search service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeQuery {
    pub jurisdiction: String,
    pub keywords: String,
    pub published_since: NaiveDate,
    pub limit: u32,
}
