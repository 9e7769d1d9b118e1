use std::collections::HashSet;

use super::domain::Tender;

/// Keep the first tender for each distinct id, preserving first-seen order.
///
/// Callers must pass tenders already merged in jurisdiction order; later
/// occurrences are dropped even when their content differs.
pub fn dedupe<I>(tenders: I) -> Vec<Tender>
where
    I: IntoIterator<Item = Tender>,
{
    let mut seen = HashSet::new();
    tenders
        .into_iter()
        .filter(|tender| seen.insert(tender.id.clone()))
        .collect()
}
