//! Human and JSON rendering for command results.

use std::fmt::Write as _;

use serde::Serialize;

use crate::db::CoachBenchmark;
use crate::estimation::{Suggestion, format_currency};
use crate::history::SuggestionStats;
use crate::validation::{MarginReview, ValidationIssue};

/// Print `value` as pretty JSON, or the human rendering otherwise.
pub fn emit<T: Serialize>(value: &T, json: bool, human: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", human(value));
    }
    Ok(())
}

pub fn suggestion(s: &Suggestion) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", s.suggestion);
    let _ = writeln!(out, "  {}", s.reasoning);
    let _ = write!(out, "  Confidence: {} ({})", s.confidence, s.source.as_str().replace('_', " "));
    for caveat in &s.caveats {
        let _ = write!(out, "\n  - {}", caveat);
    }
    if let Some(id) = s.interaction_id {
        let _ = write!(out, "\n  Interaction: {}", id);
    }
    out
}

pub fn issues(list: &[ValidationIssue]) -> String {
    if list.is_empty() {
        return "No issues found.".to_string();
    }
    list.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn margin_review(review: &MarginReview) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", review.summary);
    let _ = writeln!(
        out,
        "  Gross margin: {:.1}% (benchmark {:.0}% for {})",
        review.gross_margin_percent, review.benchmark.gross_margin_percent, review.benchmark.label
    );
    let _ = writeln!(
        out,
        "  Net margin:   {:.1}% (benchmark {:.0}%)",
        review.net_margin_percent, review.benchmark.net_margin_percent
    );
    let _ = write!(out, "  Team costs:   {:.1}% of revenue", review.team_cost_percent);
    for issue in &review.issues {
        let _ = write!(out, "\n  ! {}", issue);
    }
    for positive in &review.positives {
        let _ = write!(out, "\n  + {}", positive);
    }
    let _ = write!(out, "\n  Confidence: {}", review.confidence);
    out
}

pub fn benchmarks(list: &[CoachBenchmark]) -> String {
    if list.is_empty() {
        return "No benchmarks saved.".to_string();
    }

    let width = list.iter().map(|b| b.category.len()).max().unwrap_or(0);
    list.iter()
        .map(|b| {
            let mut line = format!(
                "{:<12} {:width$}  {} to {} (typically {}), used {} times",
                b.kind.as_str(),
                b.category,
                format_currency(b.min_value),
                format_currency(b.max_value),
                format_currency(b.typical_value),
                b.times_used,
                width = width
            );
            if let Some(notes) = &b.notes {
                line.push_str(&format!("\n{:13}{}", "", notes));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn stats(stats: &SuggestionStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Suggestions: {}", stats.total);
    let _ = writeln!(
        out,
        "  used {}, adjusted {}, ignored {}, asked coach {}, pending {}",
        stats.used, stats.adjusted, stats.ignored, stats.asked_coach, stats.pending
    );
    let _ = write!(out, "  Acceptance rate: {:.1}%", stats.acceptance_rate() * 100.0);
    for source in &stats.by_source {
        let _ = write!(
            out,
            "\n  {:<16} {:>5} suggestions, {:.1}% accepted",
            source.source,
            source.total,
            source.acceptance_rate * 100.0
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimation::{CompensationBand, Confidence, SuggestionSource};
    use crate::validation::{ForecastFigures, review_forecast};

    #[test]
    fn test_suggestion_text() {
        let s = Suggestion::for_band(
            CompensationBand::new(55_000, 62_000, 70_000),
            Some("per year"),
            "Based on market data",
            Confidence::Medium,
            SuggestionSource::MarketData,
        )
        .with_caveat("Check award rates");

        let text = suggestion(&s);
        assert!(text.starts_with("$55,000 to $70,000 per year"));
        assert!(text.contains("Confidence: medium (market data)"));
        assert!(text.contains("- Check award rates"));
        assert!(!text.contains("Interaction"));
    }

    #[test]
    fn test_issue_list() {
        assert_eq!(issues(&[]), "No issues found.");
        let text = issues(&[ValidationIssue::warning("revenue_goal", "Too low")]);
        assert_eq!(text, "[warning] revenue_goal: Too low");
    }

    #[test]
    fn test_margin_review_text() {
        let review = review_forecast(&ForecastFigures {
            revenue: 100_000.0,
            cogs: 40_000.0,
            team_costs: 50_000.0,
            operating_expenses: 5_000.0,
            industry: Some("retail".to_string()),
        });
        let text = margin_review(&review);
        assert!(text.contains("Gross margin: 60.0%"));
        assert!(text.contains("! Team costs are 50.0%"));
    }

    #[test]
    fn test_empty_stats() {
        let text = stats(&SuggestionStats::default());
        assert!(text.contains("Suggestions: 0"));
        assert!(text.contains("Acceptance rate: 0.0%"));
    }
}
