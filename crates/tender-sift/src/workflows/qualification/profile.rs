use std::collections::BTreeSet;

use super::domain::{AccountId, CapabilityProfile, ProfileSubmission};

/// Reasons a submitted profile cannot be scored.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("profile is missing an account id")]
    MissingAccount,
    #[error("profile is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("profile field `{field}` must be a finite, non-negative number (found {value})")]
    InvalidAmount { field: &'static str, value: f64 },
}

/// Guard responsible for producing `CapabilityProfile` instances.
///
/// Numeric qualifications are required. Undeclared policy flags are read as
/// "not held" and a missing locality simply earns no proximity bonus.
#[derive(Debug, Clone, Default)]
pub struct ProfileGuard;

impl ProfileGuard {
    pub fn profile_from_submission(
        &self,
        submission: ProfileSubmission,
    ) -> Result<CapabilityProfile, ProfileError> {
        let account_id = submission
            .account_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(ProfileError::MissingAccount)?;

        let turnover = required_amount("turnover", submission.turnover)?;
        let public_liability_insurance = required_amount(
            "publicLiabilityInsurance",
            submission.public_liability_insurance,
        )?;
        let years_of_relevant_experience = required_amount(
            "yearsOfRelevantExperience",
            submission.years_of_relevant_experience,
        )?;

        Ok(CapabilityProfile {
            account_id: AccountId(account_id),
            turnover,
            public_liability_insurance,
            years_of_relevant_experience,
            has_safeguarding_policy: submission.has_safeguarding_policy.unwrap_or(false),
            has_enhanced_background_checks: submission
                .has_enhanced_background_checks
                .unwrap_or(false),
            has_health_safety_policy: submission.has_health_safety_policy.unwrap_or(false),
            accreditations: submission.accreditations.into_iter().collect::<BTreeSet<_>>(),
            jurisdiction: submission
                .jurisdiction
                .map(|value| value.trim().to_string())
                .unwrap_or_default(),
        })
    }
}

fn required_amount(field: &'static str, value: Option<f64>) -> Result<f64, ProfileError> {
    let value = value.ok_or(ProfileError::MissingField(field))?;
    if !value.is_finite() || value < 0.0 {
        return Err(ProfileError::InvalidAmount { field, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::qualification::domain::Accreditation;

    fn submission() -> ProfileSubmission {
        ProfileSubmission {
            account_id: Some(" acct-7 ".to_string()),
            turnover: Some(400_000.0),
            public_liability_insurance: Some(5_000_000.0),
            years_of_relevant_experience: Some(6.0),
            has_safeguarding_policy: Some(true),
            has_enhanced_background_checks: Some(true),
            has_health_safety_policy: None,
            accreditations: vec![
                Accreditation::TrustMark,
                Accreditation::Chas,
                Accreditation::TrustMark,
            ],
            jurisdiction: Some(" Maidstone, Kent ".to_string()),
        }
    }

    #[test]
    fn complete_submission_becomes_profile() {
        let profile = ProfileGuard
            .profile_from_submission(submission())
            .expect("valid profile");

        assert_eq!(profile.account_id, AccountId("acct-7".to_string()));
        assert_eq!(profile.jurisdiction, "Maidstone, Kent");
        assert!(!profile.has_health_safety_policy);
        assert_eq!(
            profile.accreditations.iter().copied().collect::<Vec<_>>(),
            vec![Accreditation::Chas, Accreditation::TrustMark]
        );
    }

    #[test]
    fn missing_numeric_field_is_rejected() {
        let mut submission = submission();
        submission.public_liability_insurance = None;

        assert_eq!(
            ProfileGuard.profile_from_submission(submission),
            Err(ProfileError::MissingField("publicLiabilityInsurance"))
        );
    }

    #[test]
    fn negative_or_non_finite_amounts_are_rejected() {
        let mut submission = submission();
        submission.turnover = Some(-1.0);
        assert!(matches!(
            ProfileGuard.profile_from_submission(submission),
            Err(ProfileError::InvalidAmount {
                field: "turnover",
                ..
            })
        ));

        let mut submission = self::submission();
        submission.years_of_relevant_experience = Some(f64::NAN);
        assert!(matches!(
            ProfileGuard.profile_from_submission(submission),
            Err(ProfileError::InvalidAmount {
                field: "yearsOfRelevantExperience",
                ..
            })
        ));
    }

    #[test]
    fn blank_account_is_rejected() {
        let mut submission = submission();
        submission.account_id = Some("   ".to_string());
        assert_eq!(
            ProfileGuard.profile_from_submission(submission),
            Err(ProfileError::MissingAccount)
        );
    }
}
