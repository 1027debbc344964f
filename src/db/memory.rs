//! In-process benchmark store and interaction log.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    BenchmarkInput, BenchmarkStore, CoachBenchmark, EstimateKind, InteractionLog,
    InteractionRecord, SuggestionAction,
};
use crate::error::DatabaseError;

type BenchmarkKey = (Uuid, EstimateKind, String);

/// A logged interaction plus the action recorded against it.
#[derive(Debug, Clone)]
pub struct StoredInteraction {
    pub record: InteractionRecord,
    pub action: Option<SuggestionAction>,
    pub user_value: Option<Decimal>,
    pub actioned_at: Option<DateTime<Utc>>,
}

/// Keeps benchmarks and interactions in memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    benchmarks: RwLock<HashMap<BenchmarkKey, CoachBenchmark>>,
    interactions: RwLock<HashMap<Uuid, StoredInteraction>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a logged interaction.
    pub async fn interaction(&self, id: Uuid) -> Option<StoredInteraction> {
        self.interactions.read().await.get(&id).cloned()
    }

    /// Number of logged interactions.
    pub async fn interaction_count(&self) -> usize {
        self.interactions.read().await.len()
    }
}

#[async_trait]
impl BenchmarkStore for InMemoryStore {
    async fn find_benchmark(
        &self,
        coach_id: Uuid,
        kind: EstimateKind,
        category: &str,
    ) -> Result<Option<CoachBenchmark>, DatabaseError> {
        let benchmarks = self.benchmarks.read().await;
        Ok(benchmarks
            .get(&(coach_id, kind, category.to_string()))
            .cloned())
    }

    async fn record_usage(&self, benchmark_id: Uuid) -> Result<(), DatabaseError> {
        let mut benchmarks = self.benchmarks.write().await;
        let benchmark = benchmarks
            .values_mut()
            .find(|b| b.id == benchmark_id)
            .ok_or_else(|| DatabaseError::NotFound {
                entity: "coach_benchmark".to_string(),
                id: benchmark_id.to_string(),
            })?;
        benchmark.times_used += 1;
        benchmark.last_used_at = Some(Utc::now());
        Ok(())
    }

    async fn save_benchmark(&self, input: &BenchmarkInput) -> Result<CoachBenchmark, DatabaseError> {
        input.check()?;
        let now = Utc::now();
        let key = (input.coach_id, input.kind, input.category.clone());

        let mut benchmarks = self.benchmarks.write().await;
        let benchmark = benchmarks
            .entry(key)
            .and_modify(|b| {
                b.min_value = input.min_value;
                b.max_value = input.max_value;
                b.typical_value = input.typical_value;
                b.notes = input.notes.clone();
                b.updated_at = now;
            })
            .or_insert_with(|| CoachBenchmark {
                id: Uuid::new_v4(),
                coach_id: input.coach_id,
                kind: input.kind,
                category: input.category.clone(),
                min_value: input.min_value,
                max_value: input.max_value,
                typical_value: input.typical_value,
                notes: input.notes.clone(),
                times_used: 0,
                last_used_at: None,
                created_at: now,
                updated_at: now,
            });
        Ok(benchmark.clone())
    }

    async fn list_benchmarks(&self, coach_id: Uuid) -> Result<Vec<CoachBenchmark>, DatabaseError> {
        let benchmarks = self.benchmarks.read().await;
        let mut list: Vec<CoachBenchmark> = benchmarks
            .values()
            .filter(|b| b.coach_id == coach_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| {
            a.kind
                .as_str()
                .cmp(b.kind.as_str())
                .then_with(|| a.category.cmp(&b.category))
        });
        Ok(list)
    }
}

#[async_trait]
impl InteractionLog for InMemoryStore {
    async fn log_interaction(&self, record: &InteractionRecord) -> Result<Uuid, DatabaseError> {
        self.interactions.write().await.insert(
            record.id,
            StoredInteraction {
                record: record.clone(),
                action: None,
                user_value: None,
                actioned_at: None,
            },
        );
        Ok(record.id)
    }

    async fn record_action(
        &self,
        interaction_id: Uuid,
        action: SuggestionAction,
        user_value: Option<Decimal>,
    ) -> Result<(), DatabaseError> {
        let mut interactions = self.interactions.write().await;
        let stored = interactions
            .get_mut(&interaction_id)
            .ok_or_else(|| DatabaseError::NotFound {
                entity: "ai_interaction".to_string(),
                id: interaction_id.to_string(),
            })?;
        stored.action = Some(action);
        stored.user_value = user_value;
        stored.actioned_at = Some(Utc::now());
        Ok(())
    }
}
