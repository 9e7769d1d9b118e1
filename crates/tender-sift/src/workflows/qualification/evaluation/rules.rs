use serde::{Deserialize, Serialize};

use super::super::domain::CapabilityProfile;
use super::config::ScoringConfig;
use super::ScoreComponent;
use crate::workflows::discovery::Tender;

/// Scoring rules, listed in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Turnover,
    Insurance,
    Experience,
    Safeguarding,
    BackgroundChecks,
    HealthSafety,
    Accreditation,
    JurisdictionMatch,
}

pub(crate) fn score_tender(
    tender: &Tender,
    profile: &CapabilityProfile,
    config: &ScoringConfig,
) -> Vec<ScoreComponent> {
    let mut components = Vec::new();

    if let Some(value) = tender.value {
        components.push(turnover(profile.turnover, value));
    }

    let cover = profile.public_liability_insurance;
    let minimum = config.minimum_public_liability;
    components.push(if cover >= minimum {
        ScoreComponent::pass(
            RuleKind::Insurance,
            15,
            format!(
                "Public liability cover of {} meets the {} minimum",
                format_amount(cover),
                format_amount(minimum)
            ),
        )
    } else {
        ScoreComponent::issue(
            RuleKind::Insurance,
            -20,
            format!(
                "Public liability cover of {} is below the {} minimum",
                format_amount(cover),
                format_amount(minimum)
            ),
        )
    });

    components.push(experience(profile.years_of_relevant_experience));

    components.push(policy(
        RuleKind::Safeguarding,
        profile.has_safeguarding_policy,
        (8, "Safeguarding policy in place"),
        (-15, "No safeguarding policy"),
    ));
    components.push(policy(
        RuleKind::BackgroundChecks,
        profile.has_enhanced_background_checks,
        (8, "Enhanced background checks in place for operatives"),
        (-10, "No enhanced background checks for operatives"),
    ));
    components.push(policy(
        RuleKind::HealthSafety,
        profile.has_health_safety_policy,
        (7, "Health and safety policy in place"),
        (-8, "No health and safety policy"),
    ));

    for accreditation in &profile.accreditations {
        components.push(ScoreComponent::pass(
            RuleKind::Accreditation,
            5,
            format!("{} accreditation held", accreditation.label()),
        ));
    }

    if covers_jurisdiction(&profile.jurisdiction, &tender.jurisdiction) {
        components.push(ScoreComponent::pass(
            RuleKind::JurisdictionMatch,
            3,
            format!("Based in {}", tender.jurisdiction),
        ));
    }

    components
}

fn turnover(turnover: f64, value: f64) -> ScoreComponent {
    let ratio = if value > 0.0 { turnover / value } else { f64::INFINITY };
    let turnover = format_amount(turnover);
    let value = format_amount(value);

    if ratio >= 3.0 {
        ScoreComponent::pass(
            RuleKind::Turnover,
            10,
            format!("Turnover of {turnover} is at least 3x the {value} contract value"),
        )
    } else if ratio >= 1.5 {
        ScoreComponent::pass(
            RuleKind::Turnover,
            5,
            format!("Turnover of {turnover} is at least 1.5x the {value} contract value"),
        )
    } else if ratio >= 1.0 {
        ScoreComponent::pass(
            RuleKind::Turnover,
            2,
            format!("Turnover of {turnover} covers the {value} contract value"),
        )
    } else if ratio >= 0.5 {
        ScoreComponent::issue(
            RuleKind::Turnover,
            -3,
            format!("Turnover of {turnover} is below the {value} contract value"),
        )
    } else {
        ScoreComponent::issue(
            RuleKind::Turnover,
            -10,
            format!("Turnover of {turnover} is under half the {value} contract value"),
        )
    }
}

fn experience(years: f64) -> ScoreComponent {
    let shown = format_years(years);
    if years >= 5.0 {
        ScoreComponent::pass(
            RuleKind::Experience,
            10,
            format!("{shown} years of relevant experience"),
        )
    } else if years >= 3.0 {
        ScoreComponent::pass(
            RuleKind::Experience,
            5,
            format!("{shown} years of relevant experience"),
        )
    } else if years >= 1.0 {
        ScoreComponent::issue(
            RuleKind::Experience,
            -5,
            format!("Only {shown} years of relevant experience"),
        )
    } else {
        ScoreComponent::issue(
            RuleKind::Experience,
            -15,
            "Less than one year of relevant experience".to_string(),
        )
    }
}

fn policy(
    rule: RuleKind,
    held: bool,
    present: (i32, &str),
    missing: (i32, &str),
) -> ScoreComponent {
    if held {
        ScoreComponent::pass(rule, present.0, present.1.to_string())
    } else {
        ScoreComponent::issue(rule, missing.0, missing.1.to_string())
    }
}

/// Case-insensitive containment of the tender's jurisdiction in the contractor's locality.
pub(crate) fn covers_jurisdiction(locality: &str, jurisdiction: &str) -> bool {
    let jurisdiction = jurisdiction.trim().to_lowercase();
    !jurisdiction.is_empty() && locality.to_lowercase().contains(&jurisdiction)
}

/// Whole currency units with thousands separators, e.g. `1,250,000`.
pub fn format_amount(amount: f64) -> String {
    let digits = format!("{:.0}", amount.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if amount < 0.0 && grouped != "0" {
        grouped.insert(0, '-');
    }
    grouped
}

fn format_years(years: f64) -> String {
    if years.fract() == 0.0 {
        format!("{years:.0}")
    } else {
        format!("{years:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_are_grouped_in_thousands() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.0), "999");
        assert_eq!(format_amount(80_000.0), "80,000");
        assert_eq!(format_amount(5_000_000.0), "5,000,000");
        assert_eq!(format_amount(1_234_567.6), "1,234,568");
    }

    #[test]
    fn jurisdiction_match_is_case_insensitive_containment() {
        assert!(covers_jurisdiction("Maidstone, KENT", "Kent"));
        assert!(!covers_jurisdiction("Kent", "West Sussex"));
        assert!(!covers_jurisdiction("Kent", "  "));
    }

    #[test]
    fn turnover_bands_follow_value_multiples() {
        let value = 100_000.0;
        let cases = [
            (300_000.0, 10),
            (150_000.0, 5),
            (100_000.0, 2),
            (50_000.0, -3),
            (49_999.0, -10),
        ];
        for (turnover_amount, expected) in cases {
            assert_eq!(
                turnover(turnover_amount, value).score,
                expected,
                "turnover {turnover_amount}"
            );
        }
    }

    #[test]
    fn experience_bands_follow_years() {
        let cases = [(5.0, 10), (3.0, 5), (2.5, -5), (1.0, -5), (0.5, -15)];
        for (years, expected) in cases {
            assert_eq!(experience(years).score, expected, "years {years}");
        }
        assert_eq!(experience(2.5).notes, "Only 2.5 years of relevant experience");
    }
}
