//! Forecast validation.
//!
//! Every check is a pure function that reports problems as
//! [`ValidationIssue`] values instead of failing:
//! - single-value checks for COGS percentage, revenue goal and P&L lines
//! - forecast vs goal comparison
//! - formula cycle detection
//! - completeness scoring
//! - margin review against industry benchmarks

mod benchmarks;
mod forecast;
mod formulas;
mod margin;

pub use benchmarks::{GENERAL_BENCHMARK, INDUSTRY_BENCHMARKS, IndustryBenchmark, industry_benchmark};
pub use forecast::{
    CompletenessInputs, DEFAULT_GOAL_TOLERANCE, ForecastInputs, calculate_completeness,
    round_to_precision, validate_cogs_percentage, validate_forecast_inputs,
    validate_forecast_vs_goals, validate_pl_line_value, validate_revenue_goal,
};
pub use formulas::{extract_references, validate_formulas};
pub use margin::{ForecastFigures, MarginReview, review_forecast};

use serde::{Deserialize, Serialize};

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A problem found in forecast input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Field or cell the issue refers to.
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, field, message)
    }

    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, field, message)
    }

    fn new(severity: Severity, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.field, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " ({})", suggestion)?;
        }
        Ok(())
    }
}
