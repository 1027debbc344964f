//! Single-value forecast checks and completeness scoring.

use serde::{Deserialize, Serialize};

use super::ValidationIssue;

/// Relative gap between forecast and goal totals tolerated without warning.
pub const DEFAULT_GOAL_TOLERANCE: f64 = 0.05;

const LOW_REVENUE_GOAL: f64 = 10_000.0;
const LINE_VALUE_LIMIT: f64 = 1_000_000_000.0;

/// Check a cost-of-goods-sold percentage.
pub fn validate_cogs_percentage(pct: f64) -> Option<ValidationIssue> {
    if !(0.0..=100.0).contains(&pct) {
        return Some(
            ValidationIssue::error("cogs_percentage", "COGS percentage must be between 0 and 100")
                .with_suggestion("Enter COGS as a percentage of revenue, e.g. 40 for 40%"),
        );
    }
    if pct < 5.0 {
        return Some(
            ValidationIssue::warning(
                "cogs_percentage",
                format!("A COGS of {}% is unusually low", pct),
            )
            .with_suggestion("Check that materials, direct labour and freight are included"),
        );
    }
    if pct > 95.0 {
        return Some(
            ValidationIssue::warning(
                "cogs_percentage",
                format!("A COGS of {}% is unusually high and leaves little gross margin", pct),
            )
            .with_suggestion("Review pricing or supplier costs"),
        );
    }
    None
}

/// Check an annual revenue goal.
pub fn validate_revenue_goal(revenue: f64) -> Option<ValidationIssue> {
    if revenue < 0.0 {
        return Some(ValidationIssue::error(
            "revenue_goal",
            "Revenue goal cannot be negative",
        ));
    }
    if revenue == 0.0 {
        return Some(
            ValidationIssue::error("revenue_goal", "A revenue goal is required")
                .with_suggestion("Set the revenue you are aiming for this financial year"),
        );
    }
    if revenue < LOW_REVENUE_GOAL {
        return Some(ValidationIssue::warning(
            "revenue_goal",
            format!(
                "A revenue goal of ${:.0} is very low for an annual forecast",
                revenue
            ),
        ));
    }
    None
}

/// Compare the forecast total with the goal total.
///
/// No issue when the goal is zero or the relative difference is within
/// `tolerance` (a fraction, e.g. 0.05 for 5%).
pub fn validate_forecast_vs_goals(
    forecast_total: f64,
    goal_total: f64,
    tolerance: f64,
) -> Option<ValidationIssue> {
    if goal_total == 0.0 {
        return None;
    }

    let variance = (forecast_total - goal_total).abs() / goal_total;
    if variance <= tolerance {
        return None;
    }

    let direction = if forecast_total > goal_total {
        "higher"
    } else {
        "lower"
    };
    Some(
        ValidationIssue::warning(
            "forecast_total",
            format!(
                "Forecast total is {:.1}% {} than your goal",
                variance * 100.0,
                direction
            ),
        )
        .with_suggestion("Adjust monthly figures or revisit the goal so they line up"),
    )
}

/// Check one P&L line value.
pub fn validate_pl_line_value(value: f64, category: &str, name: &str) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let field = format!("pl_line.{}", name);

    if value < 0.0 {
        match category {
            "Revenue" => issues.push(
                ValidationIssue::warning(
                    field.clone(),
                    format!("Revenue line \"{}\" is negative", name),
                )
                .with_suggestion("Record refunds or discounts as a separate line"),
            ),
            "Cost of Sales" | "Operating Expenses" => issues.push(
                ValidationIssue::warning(
                    field.clone(),
                    format!("{} line \"{}\" is negative", category, name),
                )
                .with_suggestion("Enter costs as positive amounts"),
            ),
            _ => {}
        }
    }

    if value.abs() > LINE_VALUE_LIMIT {
        issues.push(ValidationIssue::warning(
            field,
            format!("\"{}\" exceeds $1 billion; check for a typo", name),
        ));
    }

    issues
}

/// Signals used for the completeness score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletenessInputs {
    pub has_revenue_goal: bool,
    pub has_distribution_method: bool,
    pub has_cogs: bool,
    pub months_with_data: u32,
    pub total_months: u32,
    pub has_revenue_lines: bool,
    pub has_expense_lines: bool,
}

/// Weighted 0-100 measure of how much of a forecast has been filled in.
pub fn calculate_completeness(inputs: &CompletenessInputs) -> u32 {
    let mut score = 0.0;

    if inputs.has_revenue_goal {
        score += 20.0;
    }
    if inputs.has_distribution_method {
        score += 10.0;
    }
    if inputs.has_cogs {
        score += 15.0;
    }
    if inputs.has_revenue_lines {
        score += 15.0;
    }
    if inputs.has_expense_lines {
        score += 10.0;
    }
    if inputs.total_months > 0 {
        let coverage =
            (inputs.months_with_data.min(inputs.total_months)) as f64 / inputs.total_months as f64;
        score += coverage * 30.0;
    }

    score.round() as u32
}

/// Round half away from zero to `decimals` places.
pub fn round_to_precision(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// The headline figures a forecast form submits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastInputs {
    pub revenue_goal: f64,
    pub cogs_percentage: Option<f64>,
    pub forecast_total: Option<f64>,
    pub goal_tolerance: Option<f64>,
}

/// Run every applicable single-value check.
pub fn validate_forecast_inputs(inputs: &ForecastInputs) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    issues.extend(validate_revenue_goal(inputs.revenue_goal));
    if let Some(pct) = inputs.cogs_percentage {
        issues.extend(validate_cogs_percentage(pct));
    }
    if let Some(total) = inputs.forecast_total {
        let tolerance = inputs.goal_tolerance.unwrap_or(DEFAULT_GOAL_TOLERANCE);
        issues.extend(validate_forecast_vs_goals(total, inputs.revenue_goal, tolerance));
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Severity;

    fn severity(issue: Option<ValidationIssue>) -> Option<Severity> {
        issue.map(|i| i.severity)
    }

    #[test]
    fn test_cogs_percentage() {
        assert_eq!(severity(validate_cogs_percentage(110.0)), Some(Severity::Error));
        assert_eq!(severity(validate_cogs_percentage(-1.0)), Some(Severity::Error));
        assert_eq!(severity(validate_cogs_percentage(3.0)), Some(Severity::Warning));
        assert_eq!(severity(validate_cogs_percentage(96.0)), Some(Severity::Warning));
        assert_eq!(severity(validate_cogs_percentage(40.0)), None);
        assert_eq!(severity(validate_cogs_percentage(5.0)), None);
        assert_eq!(severity(validate_cogs_percentage(95.0)), None);
    }

    #[test]
    fn test_revenue_goal() {
        assert_eq!(severity(validate_revenue_goal(0.0)), Some(Severity::Error));
        assert_eq!(severity(validate_revenue_goal(-1.0)), Some(Severity::Error));
        assert_eq!(severity(validate_revenue_goal(5_000.0)), Some(Severity::Warning));
        assert_eq!(severity(validate_revenue_goal(50_000.0)), None);
        assert_eq!(severity(validate_revenue_goal(10_000.0)), None);

        let required = validate_revenue_goal(0.0).unwrap();
        assert!(required.message.contains("required"));
    }

    #[test]
    fn test_forecast_vs_goals() {
        let issue = validate_forecast_vs_goals(110_000.0, 100_000.0, 0.05).unwrap();
        assert_eq!(issue.severity, Severity::Warning);
        assert!(issue.message.contains("10.0% higher"), "{}", issue.message);

        let lower = validate_forecast_vs_goals(80_000.0, 100_000.0, 0.05).unwrap();
        assert!(lower.message.contains("20.0% lower"));

        assert!(validate_forecast_vs_goals(103_000.0, 100_000.0, 0.05).is_none());
        assert!(validate_forecast_vs_goals(103_000.0, 0.0, 0.05).is_none());
    }

    #[test]
    fn test_pl_line_value() {
        assert!(validate_pl_line_value(5_000.0, "Revenue", "Consulting").is_empty());

        let negative_revenue = validate_pl_line_value(-10.0, "Revenue", "Consulting");
        assert_eq!(negative_revenue.len(), 1);
        assert_eq!(negative_revenue[0].severity, Severity::Warning);
        assert_eq!(negative_revenue[0].field, "pl_line.Consulting");

        assert_eq!(validate_pl_line_value(-10.0, "Cost of Sales", "Stock").len(), 1);
        assert_eq!(validate_pl_line_value(-10.0, "Operating Expenses", "Rent").len(), 1);
        assert!(validate_pl_line_value(-10.0, "Other Income", "Interest").is_empty());

        let huge = validate_pl_line_value(-2_000_000_000.0, "Revenue", "Typo");
        assert_eq!(huge.len(), 2);
    }

    #[test]
    fn test_completeness() {
        let full = CompletenessInputs {
            has_revenue_goal: true,
            has_distribution_method: true,
            has_cogs: true,
            months_with_data: 12,
            total_months: 12,
            has_revenue_lines: true,
            has_expense_lines: true,
        };
        assert_eq!(calculate_completeness(&full), 100);

        assert_eq!(calculate_completeness(&CompletenessInputs::default()), 0);

        let partial = CompletenessInputs {
            has_revenue_goal: true,
            months_with_data: 5,
            total_months: 12,
            ..Default::default()
        };
        // 20 + 5/12 * 30 = 32.5
        assert_eq!(calculate_completeness(&partial), 33);

        let overfilled = CompletenessInputs {
            months_with_data: 15,
            total_months: 12,
            ..full
        };
        assert_eq!(calculate_completeness(&overfilled), 100);
    }

    #[test]
    fn test_round_to_precision() {
        assert_eq!(round_to_precision(2.345, 1), 2.3);
        assert_eq!(round_to_precision(2.5, 0), 3.0);
        assert_eq!(round_to_precision(3.5, 0), 4.0);
        assert_eq!(round_to_precision(-2.5, 0), -3.0);
        assert_eq!(round_to_precision(1234.5678, 2), 1234.57);
    }

    #[test]
    fn test_validate_forecast_inputs() {
        let issues = validate_forecast_inputs(&ForecastInputs {
            revenue_goal: 500_000.0,
            cogs_percentage: Some(120.0),
            forecast_total: Some(400_000.0),
            goal_tolerance: None,
        });
        assert_eq!(issues.len(), 2);
        assert!(issues[0].is_error());
        assert!(issues[1].message.contains("20.0% lower"));

        let clean = validate_forecast_inputs(&ForecastInputs {
            revenue_goal: 500_000.0,
            cogs_percentage: Some(40.0),
            forecast_total: Some(510_000.0),
            goal_tolerance: None,
        });
        assert!(clean.is_empty());
    }
}
