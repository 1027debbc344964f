//! Margin review against industry benchmarks.

use serde::{Deserialize, Serialize};

use super::benchmarks::{IndustryBenchmark, industry_benchmark};
use crate::estimation::Confidence;

/// Points below the gross margin benchmark that count as an issue.
const GROSS_MARGIN_SHORTFALL: f64 = 10.0;
const MIN_NET_MARGIN: f64 = 5.0;
const STRONG_NET_MARGIN: f64 = 15.0;
const MAX_TEAM_COST_PERCENT: f64 = 45.0;

const SUMMARY_HEALTHY: &str =
    "Your forecast looks healthy and is in line with industry benchmarks.";
const SUMMARY_REVIEW: &str =
    "Your forecast is reasonable, but a few areas deserve a closer look.";
const SUMMARY_ATTENTION: &str =
    "Your forecast has several areas that need attention before you rely on it.";

/// Annual forecast totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastFigures {
    pub revenue: f64,
    pub cogs: f64,
    pub team_costs: f64,
    pub operating_expenses: f64,
    pub industry: Option<String>,
}

/// Outcome of a margin review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginReview {
    pub gross_margin_percent: f64,
    pub net_margin_percent: f64,
    pub team_cost_percent: f64,
    pub benchmark: IndustryBenchmark,
    pub issues: Vec<String>,
    pub positives: Vec<String>,
    pub confidence: Confidence,
    pub summary: String,
}

fn percent_of(part: f64, revenue: f64) -> f64 {
    if revenue == 0.0 {
        0.0
    } else {
        part / revenue * 100.0
    }
}

/// Compare derived margins and team cost with the industry benchmark.
pub fn review_forecast(figures: &ForecastFigures) -> MarginReview {
    let benchmark = *industry_benchmark(figures.industry.as_deref());

    let gross_profit = figures.revenue - figures.cogs;
    let net_profit = gross_profit - figures.team_costs - figures.operating_expenses;

    let gross_margin = percent_of(gross_profit, figures.revenue);
    let net_margin = percent_of(net_profit, figures.revenue);
    let team_cost = percent_of(figures.team_costs, figures.revenue);

    let mut issues = Vec::new();
    let mut positives = Vec::new();

    if gross_margin < benchmark.gross_margin_percent - GROSS_MARGIN_SHORTFALL {
        issues.push(format!(
            "Gross margin of {:.1}% is well below the {} benchmark of {:.0}%",
            gross_margin, benchmark.label, benchmark.gross_margin_percent
        ));
    } else if gross_margin >= benchmark.gross_margin_percent {
        positives.push(format!(
            "Gross margin of {:.1}% meets or beats the {} benchmark of {:.0}%",
            gross_margin, benchmark.label, benchmark.gross_margin_percent
        ));
    }

    if net_margin < MIN_NET_MARGIN {
        issues.push(format!(
            "Net margin of {:.1}% is below {:.0}%, leaving little buffer",
            net_margin, MIN_NET_MARGIN
        ));
    } else if net_margin >= STRONG_NET_MARGIN {
        positives.push(format!("Net margin of {:.1}% is strong", net_margin));
    }

    if team_cost > MAX_TEAM_COST_PERCENT {
        issues.push(format!(
            "Team costs are {:.1}% of revenue, above the {:.0}% guideline",
            team_cost, MAX_TEAM_COST_PERCENT
        ));
    }

    let (confidence, summary) = match issues.len() {
        0 => (Confidence::High, SUMMARY_HEALTHY),
        1 | 2 => (Confidence::Medium, SUMMARY_REVIEW),
        _ => (Confidence::Low, SUMMARY_ATTENTION),
    };

    tracing::debug!(
        industry = benchmark.key,
        gross_margin,
        net_margin,
        team_cost,
        issues = issues.len(),
        "Reviewed forecast margins"
    );

    MarginReview {
        gross_margin_percent: gross_margin,
        net_margin_percent: net_margin,
        team_cost_percent: team_cost,
        benchmark,
        issues,
        positives,
        confidence,
        summary: summary.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn figures(revenue: f64, cogs: f64, team: f64, opex: f64, industry: &str) -> ForecastFigures {
        ForecastFigures {
            revenue,
            cogs,
            team_costs: team,
            operating_expenses: opex,
            industry: Some(industry.to_string()),
        }
    }

    #[test]
    fn test_healthy_forecast() {
        // gross 65%, net 20%, team 30%
        let review = review_forecast(&figures(1_000_000.0, 350_000.0, 300_000.0, 150_000.0, "consulting"));
        assert_eq!(review.benchmark.key, "professional_services");
        assert!((review.gross_margin_percent - 65.0).abs() < 1e-9);
        assert!((review.net_margin_percent - 20.0).abs() < 1e-9);
        assert!(review.issues.is_empty());
        assert_eq!(review.positives.len(), 2);
        assert_eq!(review.confidence, Confidence::High);
        assert_eq!(review.summary, SUMMARY_HEALTHY);
    }

    #[test]
    fn test_struggling_forecast() {
        // gross 40% vs 60% benchmark, net -10%, team 50%
        let review = review_forecast(&figures(500_000.0, 300_000.0, 250_000.0, 0.0, "professional services"));
        assert_eq!(review.issues.len(), 3);
        assert!(review.positives.is_empty());
        assert_eq!(review.confidence, Confidence::Low);
        assert_eq!(review.summary, SUMMARY_ATTENTION);
    }

    #[test]
    fn test_single_issue_is_medium() {
        // construction benchmark 25%: gross 30%, net 3%, team 20%
        let review = review_forecast(&figures(100_000.0, 70_000.0, 20_000.0, 7_000.0, "Construction"));
        assert_eq!(review.issues.len(), 1);
        assert_eq!(review.positives.len(), 1);
        assert_eq!(review.confidence, Confidence::Medium);
        assert_eq!(review.summary, SUMMARY_REVIEW);
    }

    #[test]
    fn test_gross_margin_within_shortfall_is_neutral() {
        // general benchmark 40%: gross 35% is neither an issue nor a positive
        let review = review_forecast(&ForecastFigures {
            revenue: 100_000.0,
            cogs: 65_000.0,
            team_costs: 10_000.0,
            operating_expenses: 15_000.0,
            industry: None,
        });
        assert_eq!(review.benchmark.key, "general");
        assert!(review.issues.is_empty());
        assert!(review.positives.is_empty());
    }

    #[test]
    fn test_zero_revenue_guarded() {
        let review = review_forecast(&ForecastFigures::default());
        assert_eq!(review.gross_margin_percent, 0.0);
        assert_eq!(review.net_margin_percent, 0.0);
        assert_eq!(review.team_cost_percent, 0.0);
        // gross 0 vs 40 benchmark, net 0 < 5
        assert_eq!(review.issues.len(), 2);
    }
}
