//! Pluggable estimation sources.

use async_trait::async_trait;

use super::project::{generic_project_cost, market_project_cost};
use super::salary::{heuristic_salary, market_salary};
use super::suggestion::{EstimateContext, ProjectDetails, SalaryDetails, Suggestion};

/// Produces estimates when no coach benchmark applies.
///
/// Implementations must always answer; falling back to a low-confidence
/// range is preferable to an error the caller has to handle.
#[async_trait]
pub trait EstimationSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Estimate pay for a role.
    async fn salary(
        &self,
        role: &str,
        ctx: &EstimateContext,
        details: &SalaryDetails,
    ) -> Suggestion;

    /// Estimate the cost of a one-off project.
    async fn project_cost(
        &self,
        project: &str,
        ctx: &EstimateContext,
        details: &ProjectDetails,
    ) -> Suggestion;
}

/// Default source backed by the static guides and keyword heuristics.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceTables;

#[async_trait]
impl EstimationSource for ReferenceTables {
    fn name(&self) -> &str {
        "reference_tables"
    }

    async fn salary(
        &self,
        role: &str,
        _ctx: &EstimateContext,
        details: &SalaryDetails,
    ) -> Suggestion {
        market_salary(role, details).unwrap_or_else(|| heuristic_salary(role))
    }

    async fn project_cost(
        &self,
        project: &str,
        _ctx: &EstimateContext,
        details: &ProjectDetails,
    ) -> Suggestion {
        market_project_cost(project, details).unwrap_or_else(|| generic_project_cost(project))
    }
}
