//! PostgreSQL store for coach benchmarks and the interaction log.

use async_trait::async_trait;
use deadpool_postgres::{Config, Pool, Runtime};
use rust_decimal::Decimal;
use tokio_postgres::{NoTls, Row};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::db::{
    BenchmarkInput, BenchmarkStore, CoachBenchmark, EstimateKind, InteractionLog,
    InteractionRecord, SuggestionAction,
};
use crate::error::DatabaseError;

mod embedded {
    refinery::embed_migrations!("migrations");
}

const BENCHMARK_COLUMNS: &str = "id, coach_id, benchmark_type, category, min_value, max_value, \
     typical_value, notes, times_used, last_used_at, created_at, updated_at";

/// Database store for the advisor.
pub struct Store {
    pool: Pool,
}

impl Store {
    /// Create a new store and connect to the database.
    pub async fn new(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let mut cfg = Config::new();
        cfg.url = Some(config.url().to_string());
        cfg.pool = Some(deadpool_postgres::PoolConfig {
            max_size: config.pool_size,
            ..Default::default()
        });

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| DatabaseError::Pool(e.to_string()))?;

        // Test connection
        let _ = pool.get().await?;

        tracing::info!(pool_size = config.pool_size, "Connected to database");
        Ok(Self { pool })
    }

    /// Apply the embedded schema migrations.
    pub async fn run_migrations(&self) -> Result<(), DatabaseError> {
        let mut client = self.conn().await?;
        let report = embedded::migrations::runner()
            .run_async(&mut **client)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;

        let applied = report.applied_migrations();
        if applied.is_empty() {
            tracing::info!("Database schema is up to date");
        }
        for migration in applied {
            tracing::info!(
                version = migration.version(),
                name = migration.name(),
                "Applied migration"
            );
        }
        Ok(())
    }

    /// Get a connection from the pool.
    pub async fn conn(&self) -> Result<deadpool_postgres::Object, DatabaseError> {
        Ok(self.pool.get().await?)
    }
}

fn benchmark_from_row(row: &Row) -> Result<CoachBenchmark, DatabaseError> {
    let kind: String = row.get("benchmark_type");
    let kind = kind
        .parse::<EstimateKind>()
        .map_err(DatabaseError::InvalidData)?;

    Ok(CoachBenchmark {
        id: row.get("id"),
        coach_id: row.get("coach_id"),
        kind,
        category: row.get("category"),
        min_value: row.get("min_value"),
        max_value: row.get("max_value"),
        typical_value: row.get("typical_value"),
        notes: row.get("notes"),
        times_used: row.get("times_used"),
        last_used_at: row.get("last_used_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl BenchmarkStore for Store {
    async fn find_benchmark(
        &self,
        coach_id: Uuid,
        kind: EstimateKind,
        category: &str,
    ) -> Result<Option<CoachBenchmark>, DatabaseError> {
        let conn = self.conn().await?;
        let row = conn
            .query_opt(
                &format!(
                    "SELECT {} FROM coach_benchmarks \
                     WHERE coach_id = $1 AND benchmark_type = $2 AND category = $3",
                    BENCHMARK_COLUMNS
                ),
                &[&coach_id, &kind.as_str(), &category],
            )
            .await?;

        row.as_ref().map(benchmark_from_row).transpose()
    }

    async fn record_usage(&self, benchmark_id: Uuid) -> Result<(), DatabaseError> {
        let conn = self.conn().await?;
        let updated = conn
            .execute(
                "UPDATE coach_benchmarks SET times_used = times_used + 1, last_used_at = NOW() \
                 WHERE id = $1",
                &[&benchmark_id],
            )
            .await?;

        if updated == 0 {
            return Err(DatabaseError::NotFound {
                entity: "coach_benchmark".to_string(),
                id: benchmark_id.to_string(),
            });
        }
        Ok(())
    }

    async fn save_benchmark(&self, input: &BenchmarkInput) -> Result<CoachBenchmark, DatabaseError> {
        input.check()?;

        let conn = self.conn().await?;
        let row = conn
            .query_one(
                &format!(
                    r#"
                    INSERT INTO coach_benchmarks (
                        id, coach_id, benchmark_type, category,
                        min_value, max_value, typical_value, notes
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    ON CONFLICT (coach_id, benchmark_type, category) DO UPDATE SET
                        min_value = EXCLUDED.min_value,
                        max_value = EXCLUDED.max_value,
                        typical_value = EXCLUDED.typical_value,
                        notes = EXCLUDED.notes,
                        updated_at = NOW()
                    RETURNING {}
                    "#,
                    BENCHMARK_COLUMNS
                ),
                &[
                    &Uuid::new_v4(),
                    &input.coach_id,
                    &input.kind.as_str(),
                    &input.category,
                    &input.min_value,
                    &input.max_value,
                    &input.typical_value,
                    &input.notes,
                ],
            )
            .await?;

        let saved = benchmark_from_row(&row)?;
        tracing::debug!(
            coach_id = %saved.coach_id,
            kind = %saved.kind,
            category = %saved.category,
            "Saved coach benchmark"
        );
        Ok(saved)
    }

    async fn list_benchmarks(&self, coach_id: Uuid) -> Result<Vec<CoachBenchmark>, DatabaseError> {
        let conn = self.conn().await?;
        let rows = conn
            .query(
                &format!(
                    "SELECT {} FROM coach_benchmarks WHERE coach_id = $1 \
                     ORDER BY benchmark_type, category",
                    BENCHMARK_COLUMNS
                ),
                &[&coach_id],
            )
            .await?;

        rows.iter().map(benchmark_from_row).collect()
    }
}

#[async_trait]
impl InteractionLog for Store {
    async fn log_interaction(&self, record: &InteractionRecord) -> Result<Uuid, DatabaseError> {
        let context = serde_json::to_value(&record.context)?;
        let suggestion = serde_json::to_value(&record.suggestion)?;

        let conn = self.conn().await?;
        conn.execute(
            r#"
            INSERT INTO ai_interactions (
                id, business_id, user_id, coach_id, interaction_type, query,
                context, details, suggestion, confidence, source, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
            &[
                &record.id,
                &record.context.business_id,
                &record.context.user_id,
                &record.context.coach_id,
                &record.kind.as_str(),
                &record.query,
                &context,
                &record.details,
                &suggestion,
                &record.suggestion.confidence.as_str(),
                &record.suggestion.source.as_str(),
                &record.created_at,
            ],
        )
        .await?;

        Ok(record.id)
    }

    async fn record_action(
        &self,
        interaction_id: Uuid,
        action: SuggestionAction,
        user_value: Option<Decimal>,
    ) -> Result<(), DatabaseError> {
        let conn = self.conn().await?;
        let updated = conn
            .execute(
                "UPDATE ai_interactions SET action_taken = $2, user_value = $3, actioned_at = NOW() \
                 WHERE id = $1",
                &[&interaction_id, &action.as_str(), &user_value],
            )
            .await?;

        if updated == 0 {
            return Err(DatabaseError::NotFound {
                entity: "ai_interaction".to_string(),
                id: interaction_id.to_string(),
            });
        }
        Ok(())
    }
}
