//! Wire shapes for the upstream OCDS search response.
//!
//! Only the handful of fields the normalizer reads are modelled. Every field is
//! optional because upstream records are frequently sparse, and a field of the
//! wrong shape reads as absent instead of rejecting the release.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRelease {
    #[serde(default, deserialize_with = "lenient_id")]
    pub ocid: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub tender: Option<RawTender>,
    #[serde(default, deserialize_with = "lenient")]
    pub buyer: Option<RawParty>,
}

impl RawRelease {
    /// Contracting identifier used as the tender identity (`ocid`, else release `id`).
    pub fn notice_id(&self) -> Option<&str> {
        self.ocid.as_deref().or(self.id.as_deref()).map(str::trim)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTender {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<RawValue>,
    #[serde(default, deserialize_with = "lenient")]
    pub enquiry_period: Option<RawPeriod>,
    #[serde(default, deserialize_with = "lenient")]
    pub tender_period: Option<RawPeriod>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawParty {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawValue {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPeriod {
    #[serde(default, deserialize_with = "lenient_text")]
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    releases: Option<Vec<Value>>,
}

/// Releases decoded from one search response.
#[derive(Debug, Default)]
pub struct ParsedReleases {
    pub releases: Vec<RawRelease>,
    /// Entries in the `releases` array that were not JSON objects.
    pub malformed: usize,
}

/// Decode a search response body.
///
/// A body that is not a JSON object fails as a whole. A missing `releases`
/// collection yields zero releases. Entries that are not objects are skipped
/// and counted; inside an object, badly shaped fields read as absent.
pub fn parse_search_response(body: &[u8]) -> Result<ParsedReleases, serde_json::Error> {
    let envelope: SearchEnvelope = serde_json::from_slice(body)?;
    let mut parsed = ParsedReleases::default();

    for value in envelope.releases.unwrap_or_default() {
        if !value.is_object() {
            parsed.malformed += 1;
            continue;
        }
        match serde_json::from_value::<RawRelease>(value) {
            Ok(release) => parsed.releases.push(release),
            Err(_) => parsed.malformed += 1,
        }
    }

    Ok(parsed)
}

/// Nested records must be objects; anything else becomes `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .filter(Value::is_object)
        .and_then(|value| serde_json::from_value(value).ok()))
}

/// Non-blank strings only; any other JSON type is treated as unspecified.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text),
        _ => None,
    })
}

/// Identifiers are usually strings but some publishers emit bare numbers.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// Amounts arrive as numbers or as formatted strings ("120,000.00"). Anything
/// unparseable, non-finite or non-positive is treated as unspecified.
fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let amount = match raw {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text
            .trim()
            .trim_start_matches('£')
            .replace(',', "")
            .parse::<f64>()
            .ok(),
        _ => None,
    };

    Ok(amount.filter(|value| value.is_finite() && *value > 0.0))
}
