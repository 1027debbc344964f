//! Salary and project cost estimation.
//!
//! Estimates come from, in order of precedence:
//! - the requesting coach's own benchmark for the category
//! - an [`EstimationSource`], by default the static reference guides with a
//!   keyword heuristic behind them
//!
//! Every answer is written to the interaction log when one is configured.
//! Benchmark and log failures are logged and swallowed, so callers always get
//! a suggestion back.

mod normalize;
mod project;
mod salary;
mod source;
mod suggestion;
mod tables;

pub use normalize::{normalize_project_type, normalize_role, tokenize, underscored};
pub use project::{complexity_multiplier, generic_project_band};
pub use salary::{heuristic_band, location_multiplier};
pub use source::{EstimationSource, ReferenceTables};
pub use suggestion::{
    Confidence, EstimateContext, ProjectDetails, SalaryDetails, Suggestion, SuggestionSource,
    format_currency,
};
pub use tables::{
    CompensationBand, GuideEntry, PROJECT_COST_GUIDE, SALARY_GUIDE, project_band, salary_band,
};

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::{BenchmarkStore, CoachBenchmark, EstimateKind, InteractionLog, InteractionRecord, SuggestionAction};

/// Canonical benchmark category for free-text input.
///
/// Salary categories are role keys; project categories are project-type keys,
/// or the underscored text when no project type matches.
pub fn benchmark_category(kind: EstimateKind, text: &str) -> String {
    match kind {
        EstimateKind::Salary => normalize_role(text),
        EstimateKind::ProjectCost => normalize_project_type(text)
            .map(str::to_string)
            .unwrap_or_else(|| underscored(text)),
    }
}

/// Combined estimator.
pub struct Advisor {
    source: Arc<dyn EstimationSource>,
    benchmarks: Option<Arc<dyn BenchmarkStore>>,
    interactions: Option<Arc<dyn InteractionLog>>,
}

impl Advisor {
    /// Create an advisor backed by the reference guides only.
    pub fn new() -> Self {
        Self {
            source: Arc::new(ReferenceTables),
            benchmarks: None,
            interactions: None,
        }
    }

    /// Replace the estimation source.
    pub fn with_source(mut self, source: Arc<dyn EstimationSource>) -> Self {
        self.source = source;
        self
    }

    /// Consult coach benchmarks before the estimation source.
    pub fn with_benchmarks(mut self, store: Arc<dyn BenchmarkStore>) -> Self {
        self.benchmarks = Some(store);
        self
    }

    /// Log every suggestion to `log`.
    pub fn with_interaction_log(mut self, log: Arc<dyn InteractionLog>) -> Self {
        self.interactions = Some(log);
        self
    }

    /// Suggest a salary range for a role.
    pub async fn salary_estimate(
        &self,
        role: &str,
        ctx: &EstimateContext,
        details: &SalaryDetails,
    ) -> Suggestion {
        let kind = EstimateKind::Salary;
        let category = benchmark_category(kind, role);

        let suggestion = match self.coach_override(ctx, kind, &category).await {
            Some(s) => s,
            None => self.source.salary(role, ctx, details).await,
        };

        let details = serde_json::to_value(details).unwrap_or_default();
        self.log(kind, role, ctx, details, suggestion).await
    }

    /// Suggest a cost range for a one-off project.
    pub async fn project_cost_estimate(
        &self,
        project: &str,
        ctx: &EstimateContext,
        details: &ProjectDetails,
    ) -> Suggestion {
        let kind = EstimateKind::ProjectCost;
        let category = benchmark_category(kind, project);

        let suggestion = match self.coach_override(ctx, kind, &category).await {
            Some(s) => s,
            None => self.source.project_cost(project, ctx, details).await,
        };

        let details = serde_json::to_value(details).unwrap_or_default();
        self.log(kind, project, ctx, details, suggestion).await
    }

    /// Report what the user did with a suggestion. Best-effort.
    pub async fn record_action(
        &self,
        interaction_id: Uuid,
        action: SuggestionAction,
        user_value: Option<Decimal>,
    ) {
        let Some(log) = &self.interactions else {
            return;
        };
        if let Err(e) = log.record_action(interaction_id, action, user_value).await {
            tracing::warn!(
                interaction_id = %interaction_id,
                action = %action,
                "Failed to record suggestion action: {}",
                e
            );
        }
    }

    async fn coach_override(
        &self,
        ctx: &EstimateContext,
        kind: EstimateKind,
        category: &str,
    ) -> Option<Suggestion> {
        let coach_id = ctx.coach_id?;
        let store = self.benchmarks.as_ref()?;

        let benchmark = match store.find_benchmark(coach_id, kind, category).await {
            Ok(Some(b)) => b,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(
                    coach_id = %coach_id,
                    kind = %kind,
                    category,
                    "Benchmark lookup failed, falling back to {}: {}",
                    self.source.name(),
                    e
                );
                return None;
            }
        };

        if let Err(e) = store.record_usage(benchmark.id).await {
            tracing::warn!(benchmark_id = %benchmark.id, "Failed to record benchmark usage: {}", e);
        }

        tracing::debug!(coach_id = %coach_id, kind = %kind, category, "Using coach benchmark");
        Some(benchmark_suggestion(&benchmark))
    }

    async fn log(
        &self,
        kind: EstimateKind,
        query: &str,
        ctx: &EstimateContext,
        details: serde_json::Value,
        mut suggestion: Suggestion,
    ) -> Suggestion {
        let Some(log) = &self.interactions else {
            return suggestion;
        };

        let record = InteractionRecord::new(kind, query, ctx.clone(), details, suggestion.clone());
        match log.log_interaction(&record).await {
            Ok(id) => suggestion.interaction_id = Some(id),
            Err(e) => tracing::warn!(kind = %kind, "Failed to log interaction: {}", e),
        }
        suggestion
    }
}

impl Default for Advisor {
    fn default() -> Self {
        Self::new()
    }
}

fn benchmark_suggestion(benchmark: &CoachBenchmark) -> Suggestion {
    let unit = match benchmark.kind {
        EstimateKind::Salary => Some("per year"),
        EstimateKind::ProjectCost => None,
    };

    let mut reasoning = format!(
        "Based on your coach's benchmark for {}",
        benchmark.category.replace('_', " ")
    );
    if let Some(notes) = benchmark.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        reasoning.push_str(&format!(". Coach notes: {}", notes.trim()));
    }

    Suggestion::for_band(
        benchmark.band(),
        unit,
        reasoning,
        Confidence::High,
        SuggestionSource::CoachBenchmark,
    )
}
