//! Collaborator interfaces for coach benchmarks and the interaction log.
//!
//! The advisor only reads benchmarks (and bumps their usage counter) and
//! writes interactions. Both are optional; see [`crate::estimation::Advisor`].

mod memory;

pub use memory::{InMemoryStore, StoredInteraction};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::estimation::{CompensationBand, EstimateContext, Suggestion};

/// What is being estimated. Doubles as the benchmark type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateKind {
    Salary,
    ProjectCost,
}

impl EstimateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Salary => "salary",
            Self::ProjectCost => "project_cost",
        }
    }
}

impl std::fmt::Display for EstimateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EstimateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "salary" => Ok(Self::Salary),
            "project_cost" | "project" => Ok(Self::ProjectCost),
            _ => Err(format!(
                "invalid estimate kind '{}', expected 'salary' or 'project_cost'",
                s
            )),
        }
    }
}

/// A coach's override of the default range for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachBenchmark {
    pub id: Uuid,
    pub coach_id: Uuid,
    pub kind: EstimateKind,
    /// Canonical category key, e.g. `bookkeeper` or `crm_implementation`.
    pub category: String,
    pub min_value: Decimal,
    pub max_value: Decimal,
    pub typical_value: Decimal,
    pub notes: Option<String>,
    pub times_used: i32,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CoachBenchmark {
    pub fn band(&self) -> CompensationBand {
        CompensationBand {
            min: self.min_value,
            max: self.max_value,
            typical: self.typical_value,
        }
    }
}

/// Values for creating or replacing a benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkInput {
    pub coach_id: Uuid,
    pub kind: EstimateKind,
    pub category: String,
    pub min_value: Decimal,
    pub max_value: Decimal,
    pub typical_value: Decimal,
    pub notes: Option<String>,
}

impl BenchmarkInput {
    /// Reject ranges that are negative or not ordered min <= typical <= max.
    pub fn check(&self) -> Result<(), DatabaseError> {
        if self.category.trim().is_empty() {
            return Err(DatabaseError::Constraint(
                "benchmark category must not be empty".to_string(),
            ));
        }
        if self.min_value.is_sign_negative() {
            return Err(DatabaseError::Constraint(
                "benchmark values must not be negative".to_string(),
            ));
        }
        if !(self.min_value <= self.typical_value && self.typical_value <= self.max_value) {
            return Err(DatabaseError::Constraint(format!(
                "benchmark range must satisfy min <= typical <= max (got {} / {} / {})",
                self.min_value, self.typical_value, self.max_value
            )));
        }
        Ok(())
    }
}

/// What the user did with a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionAction {
    Used,
    Adjusted,
    Ignored,
    AskedCoach,
}

impl SuggestionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Used => "used",
            Self::Adjusted => "adjusted",
            Self::Ignored => "ignored",
            Self::AskedCoach => "asked_coach",
        }
    }
}

impl std::fmt::Display for SuggestionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SuggestionAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "used" => Ok(Self::Used),
            "adjusted" => Ok(Self::Adjusted),
            "ignored" => Ok(Self::Ignored),
            "asked_coach" | "asked-coach" => Ok(Self::AskedCoach),
            _ => Err(format!(
                "invalid action '{}', expected 'used', 'adjusted', 'ignored' or 'asked_coach'",
                s
            )),
        }
    }
}

/// One estimate request and its answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub id: Uuid,
    pub kind: EstimateKind,
    /// The role or project text as the user typed it.
    pub query: String,
    pub context: EstimateContext,
    /// Experience/location or scope/complexity, as JSON.
    pub details: serde_json::Value,
    pub suggestion: Suggestion,
    pub created_at: DateTime<Utc>,
}

impl InteractionRecord {
    pub fn new(
        kind: EstimateKind,
        query: impl Into<String>,
        context: EstimateContext,
        details: serde_json::Value,
        suggestion: Suggestion,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            query: query.into(),
            context,
            details,
            suggestion,
            created_at: Utc::now(),
        }
    }
}

/// Read access to coach benchmark overrides.
#[async_trait]
pub trait BenchmarkStore: Send + Sync {
    /// Find the override for one coach, kind and category.
    async fn find_benchmark(
        &self,
        coach_id: Uuid,
        kind: EstimateKind,
        category: &str,
    ) -> Result<Option<CoachBenchmark>, DatabaseError>;

    /// Bump `times_used` and `last_used_at`.
    async fn record_usage(&self, benchmark_id: Uuid) -> Result<(), DatabaseError>;

    /// Create or replace the benchmark for `(coach_id, kind, category)`.
    async fn save_benchmark(&self, input: &BenchmarkInput) -> Result<CoachBenchmark, DatabaseError>;

    async fn list_benchmarks(&self, coach_id: Uuid) -> Result<Vec<CoachBenchmark>, DatabaseError>;
}

/// Write-only sink for estimate interactions.
#[async_trait]
pub trait InteractionLog: Send + Sync {
    /// Persist an interaction, returning its id.
    async fn log_interaction(&self, record: &InteractionRecord) -> Result<Uuid, DatabaseError>;

    /// Record what the user did with a logged suggestion.
    async fn record_action(
        &self,
        interaction_id: Uuid,
        action: SuggestionAction,
        user_value: Option<Decimal>,
    ) -> Result<(), DatabaseError>;
}
