use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::Tender;

const CORE_KEYWORDS: &[&str] = &[
    "adaptation",
    "disabled facilities",
    "dfg",
    "accessibility",
    "stairlift",
    "stair lift",
    "through floor lift",
    "wet room",
    "level access",
    "level-access",
    "ceiling hoist",
    "grab rail",
];

const EXCLUDE_KEYWORDS: &[&str] = &[
    "software",
    "it system",
    "digital platform",
    "legal services",
    "consultancy",
    "recruitment",
    "training course",
    "insurance services",
];

const CONTEXT_KEYWORDS: &[&str] = &[
    "works",
    "installation",
    "install",
    "construction",
    "contractor",
    "building",
    "refurbishment",
];

/// Whether a context keyword is required alongside a core keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceMode {
    #[default]
    CoreOnly,
    CoreAndContext,
}

impl RelevanceMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "core" | "core_only" => Some(Self::CoreOnly),
            "core_and_context" | "strict" => Some(Self::CoreAndContext),
            _ => None,
        }
    }
}

/// Keyword sets driving the relevance classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelevanceConfig {
    pub core_keywords: BTreeSet<String>,
    pub exclude_keywords: BTreeSet<String>,
    #[serde(default)]
    pub context_keywords: BTreeSet<String>,
    #[serde(default)]
    pub mode: RelevanceMode,
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        let owned = |words: &[&str]| words.iter().map(|word| word.to_string()).collect();
        Self {
            core_keywords: owned(CORE_KEYWORDS),
            exclude_keywords: owned(EXCLUDE_KEYWORDS),
            context_keywords: owned(CONTEXT_KEYWORDS),
            mode: RelevanceMode::CoreOnly,
        }
    }
}

/// Outcome of classifying a single tender, kept for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relevance {
    Relevant,
    Excluded { keyword: String },
    NoCoreKeyword,
    NoContextKeyword,
}

impl Relevance {
    pub fn is_relevant(&self) -> bool {
        matches!(self, Relevance::Relevant)
    }
}

/// Case-insensitive substring classifier over a tender's title and description.
#[derive(Debug, Clone)]
pub struct RelevanceClassifier {
    core: Vec<String>,
    exclude: Vec<String>,
    context: Vec<String>,
    mode: RelevanceMode,
}

impl RelevanceClassifier {
    pub fn new(config: &RelevanceConfig) -> Self {
        Self {
            core: lowered(&config.core_keywords),
            exclude: lowered(&config.exclude_keywords),
            context: lowered(&config.context_keywords),
            mode: config.mode,
        }
    }

    pub fn classify(&self, tender: &Tender) -> Relevance {
        let text = tender.searchable_text();

        if let Some(keyword) = self.exclude.iter().find(|word| text.contains(word.as_str())) {
            return Relevance::Excluded {
                keyword: keyword.clone(),
            };
        }

        if !self.core.iter().any(|word| text.contains(word.as_str())) {
            return Relevance::NoCoreKeyword;
        }

        if self.mode == RelevanceMode::CoreAndContext
            && !self.context.iter().any(|word| text.contains(word.as_str()))
        {
            return Relevance::NoContextKeyword;
        }

        Relevance::Relevant
    }

    pub fn is_relevant(&self, tender: &Tender) -> bool {
        self.classify(tender).is_relevant()
    }

    /// Keyword disjunction sent upstream, built from the core set.
    pub fn query_string(&self) -> String {
        self.core
            .iter()
            .map(|word| {
                if word.contains(' ') {
                    format!("\"{word}\"")
                } else {
                    word.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" OR ")
    }
}

impl Default for RelevanceClassifier {
    fn default() -> Self {
        Self::new(&RelevanceConfig::default())
    }
}

fn lowered(words: &BTreeSet<String>) -> Vec<String> {
    let set: BTreeSet<String> = words
        .iter()
        .map(|word| word.trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect();
    set.into_iter().collect()
}
