//! Salary estimation from the reference guide and keyword heuristics.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::normalize::{normalize_role, tokenize};
use super::suggestion::{Confidence, SalaryDetails, Suggestion, SuggestionSource};
use super::tables::{CompensationBand, salary_band};

const PER_YEAR: Option<&str> = Some("per year");

/// Keyword groups checked in order; the first group with a hit wins.
static HEURISTIC_BANDS: &[(&[&str], &str, u32, u32, u32)] = &[
    (&["senior", "lead", "head"], "senior", 95_000, 115_000, 140_000),
    (&["manager", "director"], "management", 85_000, 105_000, 130_000),
    (&["coordinator", "officer"], "coordinator", 60_000, 70_000, 80_000),
    (&["assistant", "support", "junior"], "support", 50_000, 57_000, 65_000),
    (&["executive", "chief", "vp"], "executive", 150_000, 190_000, 250_000),
];

const DEFAULT_HEURISTIC_BAND: (&str, u32, u32, u32) = ("general", 55_000, 70_000, 90_000);

/// Pay multiplier for a work location.
pub fn location_multiplier(location: Option<&str>) -> Decimal {
    let Some(location) = location else {
        return Decimal::ONE;
    };
    let lower = location.to_lowercase();

    if lower.contains("sydney") {
        dec!(1.10)
    } else if lower.contains("melbourne") {
        dec!(1.05)
    } else if lower.contains("regional") {
        dec!(0.90)
    } else {
        Decimal::ONE
    }
}

/// Estimate from the salary guide. `None` when the role is not in the guide.
pub fn market_salary(role: &str, details: &SalaryDetails) -> Option<Suggestion> {
    let key = normalize_role(role);
    let entry = salary_band(&key)?;

    let location = details.location.as_deref();
    let multiplier = location_multiplier(location);
    let band = entry.band().scaled(multiplier);

    let mut reasoning = format!("Based on Australian market data for {} roles", entry.label);
    if multiplier != Decimal::ONE
        && let Some(location) = location
    {
        let adjustment = (multiplier - Decimal::ONE) * dec!(100);
        reasoning.push_str(&format!(
            ", adjusted {}{}% for {}",
            if adjustment.is_sign_positive() { "+" } else { "" },
            adjustment.normalize(),
            location.trim()
        ));
    }
    reasoning.push('.');

    let mut suggestion = Suggestion::for_band(
        band,
        PER_YEAR,
        reasoning,
        Confidence::Medium,
        SuggestionSource::MarketData,
    )
    .with_caveat("Adjust for the candidate's experience and qualifications")
    .with_caveat("Industry-specific roles may vary from these ranges");

    if let Some(note) = details.experience.as_deref().and_then(experience_note) {
        suggestion = suggestion.with_caveat(note);
    }

    Some(suggestion)
}

fn experience_note(experience: &str) -> Option<String> {
    let lower = experience.to_lowercase();
    if lower.trim().is_empty() {
        return None;
    }

    let position = if ["junior", "entry", "graduate", "trainee"]
        .iter()
        .any(|k| lower.contains(k))
    {
        "near the bottom of the range"
    } else if ["senior", "expert", "extensive", "experienced"]
        .iter()
        .any(|k| lower.contains(k))
    {
        "toward the top of the range"
    } else {
        "around the typical figure"
    };

    Some(format!(
        "With {} experience, expect offers {}",
        experience.trim(),
        position
    ))
}

/// Classify a role by whole-word title keywords.
pub fn heuristic_band(role: &str) -> (&'static str, CompensationBand) {
    let tokens = tokenize(role);

    for (keywords, name, min, typical, max) in HEURISTIC_BANDS {
        if keywords.iter().any(|k| tokens.iter().any(|t| t == k)) {
            return (*name, CompensationBand::new(*min, *typical, *max));
        }
    }

    let (name, min, typical, max) = DEFAULT_HEURISTIC_BAND;
    (name, CompensationBand::new(min, typical, max))
}

/// Rough estimate for roles the guide does not cover.
pub fn heuristic_salary(role: &str) -> Suggestion {
    let (level, band) = heuristic_band(role);
    tracing::debug!(role, level, "No salary guide entry, using heuristic band");

    Suggestion::for_band(
        band,
        PER_YEAR,
        format!(
            "No market data for \"{}\"; estimated from typical {}-level pay",
            role.trim(),
            level
        ),
        Confidence::Low,
        SuggestionSource::AiEstimate,
    )
    .with_caveat("This is a rough estimate, not based on market data for this role")
    .with_caveat("Check with your coach before committing to a salary")
}
