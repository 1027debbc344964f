//! One-off project cost estimation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::normalize::normalize_project_type;
use super::suggestion::{Confidence, ProjectDetails, Suggestion, SuggestionSource};
use super::tables::{CompensationBand, project_band};

/// Range used when the project type is unknown.
pub fn generic_project_band() -> CompensationBand {
    CompensationBand::new(5_000, 15_000, 50_000)
}

/// Cost multiplier for a stated complexity.
pub fn complexity_multiplier(complexity: Option<&str>) -> Decimal {
    match complexity.map(|c| c.trim().to_lowercase()).as_deref() {
        Some("simple" | "low" | "basic") => dec!(0.85),
        Some("complex" | "high" | "advanced") => dec!(1.25),
        _ => Decimal::ONE,
    }
}

/// Estimate from the project cost guide. `None` when the type is unknown.
pub fn market_project_cost(project: &str, details: &ProjectDetails) -> Option<Suggestion> {
    let key = normalize_project_type(project)?;
    let entry = project_band(key)?;

    let multiplier = complexity_multiplier(details.complexity.as_deref());
    let band = entry.band().scaled(multiplier);

    let mut reasoning = format!("Based on typical Australian costs for a {}", entry.label);
    if multiplier != Decimal::ONE
        && let Some(complexity) = details.complexity.as_deref()
    {
        reasoning.push_str(&format!(", scaled for {} complexity", complexity.trim()));
    }
    if let Some(scope) = details.scope.as_deref().filter(|s| !s.trim().is_empty()) {
        reasoning.push_str(&format!(" (scope: {})", scope.trim()));
    }
    reasoning.push('.');

    Some(
        Suggestion::for_band(
            band,
            None,
            reasoning,
            Confidence::Medium,
            SuggestionSource::MarketData,
        )
        .with_caveat("Get at least two quotes before committing")
        .with_caveat("Costs vary with scope, supplier and timeline"),
    )
}

/// Wide fallback range for unrecognised project types.
pub fn generic_project_cost(project: &str) -> Suggestion {
    tracing::debug!(project, "No project cost guide entry, using generic range");

    Suggestion::for_band(
        generic_project_band(),
        None,
        format!(
            "No cost data for \"{}\"; most small-business projects fall in this range",
            project.trim()
        ),
        Confidence::Low,
        SuggestionSource::AiEstimate,
    )
    .with_caveat("This range is very broad; scope the project to narrow it down")
    .with_caveat("Discuss the budget with your coach before committing")
}
