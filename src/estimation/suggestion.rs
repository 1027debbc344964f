//! Suggestion value objects and request context.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tables::CompensationBand;

/// How much weight a suggestion deserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a suggestion's figures came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    /// A coach's own benchmark override.
    CoachBenchmark,
    /// The static reference guides.
    MarketData,
    /// Keyword heuristics or a pluggable estimation source.
    AiEstimate,
}

impl SuggestionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CoachBenchmark => "coach_benchmark",
            Self::MarketData => "market_data",
            Self::AiEstimate => "ai_estimate",
        }
    }
}

impl std::fmt::Display for SuggestionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An estimate handed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Headline text, e.g. "$55,000 to $70,000 per year (typically $62,000)".
    pub suggestion: String,
    pub reasoning: String,
    pub confidence: Confidence,
    pub source: SuggestionSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typical_value: Option<Decimal>,
    pub caveats: Vec<String>,
    /// Interaction log id, present once the suggestion has been logged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction_id: Option<Uuid>,
}

impl Suggestion {
    /// Create a suggestion with free text and no range.
    pub fn new(
        suggestion: impl Into<String>,
        reasoning: impl Into<String>,
        confidence: Confidence,
        source: SuggestionSource,
    ) -> Self {
        Self {
            suggestion: suggestion.into(),
            reasoning: reasoning.into(),
            confidence,
            source,
            min_value: None,
            max_value: None,
            typical_value: None,
            caveats: Vec::new(),
            interaction_id: None,
        }
    }

    /// Create a suggestion describing `band`. `unit` is appended to the range,
    /// e.g. "per year".
    pub fn for_band(
        band: CompensationBand,
        unit: Option<&str>,
        reasoning: impl Into<String>,
        confidence: Confidence,
        source: SuggestionSource,
    ) -> Self {
        let mut text = format!(
            "{} to {}",
            format_currency(band.min),
            format_currency(band.max)
        );
        if let Some(unit) = unit {
            text.push(' ');
            text.push_str(unit);
        }
        text.push_str(&format!(" (typically {})", format_currency(band.typical)));

        let mut suggestion = Self::new(text, reasoning, confidence, source);
        suggestion.min_value = Some(band.min);
        suggestion.max_value = Some(band.max);
        suggestion.typical_value = Some(band.typical);
        suggestion
    }

    pub fn with_caveat(mut self, caveat: impl Into<String>) -> Self {
        self.caveats.push(caveat.into());
        self
    }

    /// The range carried by this suggestion, if it has one.
    pub fn band(&self) -> Option<CompensationBand> {
        Some(CompensationBand {
            min: self.min_value?,
            max: self.max_value?,
            typical: self.typical_value?,
        })
    }
}

/// Who is asking and about which business.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimateContext {
    pub business_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub coach_id: Option<Uuid>,
    pub industry: Option<String>,
    pub revenue_range: Option<String>,
    pub state: Option<String>,
}

impl EstimateContext {
    pub fn for_coach(coach_id: Uuid) -> Self {
        Self {
            coach_id: Some(coach_id),
            ..Default::default()
        }
    }
}

/// Extra detail for salary estimates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryDetails {
    pub experience: Option<String>,
    pub location: Option<String>,
}

/// Extra detail for project cost estimates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetails {
    pub scope: Option<String>,
    pub complexity: Option<String>,
}

/// Format a whole-dollar amount with thousands separators, e.g. `$62,000`.
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(0)), "$0");
        assert_eq!(format_currency(dec!(950)), "$950");
        assert_eq!(format_currency(dec!(62000)), "$62,000");
        assert_eq!(format_currency(dec!(1234567.5)), "$1,234,568");
        assert_eq!(format_currency(dec!(-5000)), "-$5,000");
    }

    #[test]
    fn test_band_suggestion_text() {
        let band = CompensationBand::new(55_000, 62_000, 70_000);
        let s = Suggestion::for_band(
            band,
            Some("per year"),
            "test",
            Confidence::Medium,
            SuggestionSource::MarketData,
        );
        assert_eq!(s.suggestion, "$55,000 to $70,000 per year (typically $62,000)");
        assert_eq!(s.band(), Some(band));
    }

    #[test]
    fn test_serialized_labels() {
        let s = Suggestion::new("x", "y", Confidence::High, SuggestionSource::CoachBenchmark);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["confidence"], "high");
        assert_eq!(json["source"], "coach_benchmark");
        assert!(json.get("min_value").is_none());
        assert!(json.get("interaction_id").is_none());
    }
}
