use super::domain::Tender;
use super::parser::RawRelease;

const UNTITLED: &str = "Untitled";
const UNKNOWN_BUYER: &str = "Unknown";

/// Prefix the upstream publisher puts on every open contracting id. Notice
/// pages are addressed by the remainder.
const OCID_PREFIX: &str = "ocds-b5fd17-";

/// Builds deep links to notice pages on the upstream service.
#[derive(Debug, Clone)]
pub struct NoticeLinks {
    base: String,
}

impl NoticeLinks {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn link_for(&self, id: &str) -> String {
        let notice = id.strip_prefix(OCID_PREFIX).unwrap_or(id);
        format!("{}/Notice/{}", self.base, notice)
    }
}

/// Map a raw release retrieved under `jurisdiction` into a [`Tender`].
///
/// Returns `None` only when the release carries no identifier at all, since
/// such a record can be neither deduplicated nor linked.
pub fn normalize(release: RawRelease, jurisdiction: &str, links: &NoticeLinks) -> Option<Tender> {
    let id = release.notice_id()?.to_string();
    let tender = release.tender.unwrap_or_default();

    let deadline = tender
        .enquiry_period
        .and_then(|period| period.end_date)
        .or_else(|| tender.tender_period.and_then(|period| period.end_date))
        .map(|raw| raw.trim().to_string());

    let title = tender
        .title
        .map(|value| clean_text(&value))
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());
    let description = tender
        .description
        .map(|value| clean_text(&value))
        .unwrap_or_default();
    let buyer = release
        .buyer
        .and_then(|party| party.name)
        .map(|value| clean_text(&value))
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| UNKNOWN_BUYER.to_string());

    Some(Tender {
        url: links.link_for(&id),
        id,
        title,
        description,
        buyer,
        value: tender.value.and_then(|value| value.amount),
        deadline,
        jurisdiction: jurisdiction.to_string(),
    })
}

/// Strip invisible marker characters and collapse runs of whitespace.
pub(crate) fn clean_text(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}', '\u{a0}'], " ");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
