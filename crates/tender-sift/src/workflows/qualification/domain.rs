use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::workflows::discovery::Tender;

/// Identifier of the contractor account owning a capability profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trade accreditation schemes a contractor can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Accreditation {
    #[serde(rename = "chas")]
    Chas,
    #[serde(rename = "constructionline")]
    Constructionline,
    #[serde(rename = "trustmark")]
    TrustMark,
    #[serde(rename = "safecontractor")]
    SafeContractor,
    #[serde(rename = "iso9001")]
    Iso9001,
}

impl Accreditation {
    pub const fn label(self) -> &'static str {
        match self {
            Accreditation::Chas => "CHAS",
            Accreditation::Constructionline => "Constructionline",
            Accreditation::TrustMark => "TrustMark",
            Accreditation::SafeContractor => "SafeContractor",
            Accreditation::Iso9001 => "ISO 9001",
        }
    }
}

/// Validated contractor qualifications, read-only input to scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityProfile {
    pub account_id: AccountId,
    pub turnover: f64,
    pub public_liability_insurance: f64,
    pub years_of_relevant_experience: f64,
    pub has_safeguarding_policy: bool,
    pub has_enhanced_background_checks: bool,
    pub has_health_safety_policy: bool,
    #[serde(default)]
    pub accreditations: BTreeSet<Accreditation>,
    #[serde(default)]
    pub jurisdiction: String,
}

impl CapabilityProfile {
    /// Names of the soft-gate policies this profile lacks.
    pub fn missing_policies(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.has_safeguarding_policy {
            missing.push("safeguarding policy");
        }
        if !self.has_enhanced_background_checks {
            missing.push("enhanced background checks");
        }
        if !self.has_health_safety_policy {
            missing.push("health and safety policy");
        }
        missing
    }
}

/// Profile as submitted by a caller, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSubmission {
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub turnover: Option<f64>,
    #[serde(default)]
    pub public_liability_insurance: Option<f64>,
    #[serde(default)]
    pub years_of_relevant_experience: Option<f64>,
    #[serde(default)]
    pub has_safeguarding_policy: Option<bool>,
    #[serde(default)]
    pub has_enhanced_background_checks: Option<bool>,
    #[serde(default)]
    pub has_health_safety_policy: Option<bool>,
    #[serde(default)]
    pub accreditations: Vec<Accreditation>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
}

/// Tri-state recommendation for a tender/profile pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualificationStatus {
    Qualified,
    Conditional,
    Disqualified,
}

impl QualificationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            QualificationStatus::Qualified => "qualified",
            QualificationStatus::Conditional => "conditional",
            QualificationStatus::Disqualified => "disqualified",
        }
    }

    /// Sort position when ranking results, best first.
    pub(crate) const fn rank(self) -> u8 {
        match self {
            QualificationStatus::Qualified => 0,
            QualificationStatus::Conditional => 1,
            QualificationStatus::Disqualified => 2,
        }
    }
}

/// Public projection of a [`Tender`] carried in results and notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderView {
    pub id: String,
    pub title: String,
    pub buyer: String,
    pub value: Option<f64>,
    pub deadline: Option<String>,
    pub jurisdiction: String,
    pub url: String,
}

impl From<&Tender> for TenderView {
    fn from(tender: &Tender) -> Self {
        Self {
            id: tender.id.clone(),
            title: tender.title.clone(),
            buyer: tender.buyer.clone(),
            value: tender.value,
            deadline: tender.deadline.clone(),
            jurisdiction: tender.jurisdiction.clone(),
            url: tender.url.clone(),
        }
    }
}

/// Scored recommendation for one tender against one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualificationResult {
    pub tender: TenderView,
    pub score: i32,
    pub status: QualificationStatus,
    pub passes: Vec<String>,
    pub issues: Vec<String>,
}
