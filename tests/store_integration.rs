//! Postgres store against a throwaway container.
//!
//! Run with `cargo test --features integration`; needs a Docker daemon.

#![cfg(feature = "integration")]

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use testcontainers_modules::postgres::Postgres;
use testcontainers_modules::testcontainers::ContainerAsync;
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use tokio_test::assert_ok;
use uuid::Uuid;

use coach_advisor::config::DatabaseConfig;
use coach_advisor::db::{
    BenchmarkInput, BenchmarkStore, EstimateKind, InteractionLog, InteractionRecord,
    SuggestionAction,
};
use coach_advisor::error::DatabaseError;
use coach_advisor::estimation::{Advisor, EstimateContext, SalaryDetails, SuggestionSource};
use coach_advisor::history::Store;

async fn start() -> (ContainerAsync<Postgres>, Store) {
    let container = Postgres::default().start().await.unwrap();
    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(5432).await.unwrap();

    let config = DatabaseConfig::new(
        format!("postgres://postgres:postgres@{}:{}/postgres", host, port),
        4,
    );
    let store = Store::new(&config).await.unwrap();
    assert_ok!(store.run_migrations().await);
    (container, store)
}

fn bookkeeper(coach: Uuid, typical: rust_decimal::Decimal) -> BenchmarkInput {
    BenchmarkInput {
        coach_id: coach,
        kind: EstimateKind::Salary,
        category: "bookkeeper".to_string(),
        min_value: dec!(50000),
        max_value: dec!(70000),
        typical_value: typical,
        notes: None,
    }
}

#[tokio::test]
async fn benchmark_upsert_and_usage() {
    let (_container, store) = start().await;
    let coach = Uuid::new_v4();

    let first = store.save_benchmark(&bookkeeper(coach, dec!(60000))).await.unwrap();
    let second = store.save_benchmark(&bookkeeper(coach, dec!(65000))).await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.typical_value, dec!(65000));

    assert_ok!(store.record_usage(second.id).await);
    let found = store
        .find_benchmark(coach, EstimateKind::Salary, "bookkeeper")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.times_used, 1);
    assert!(found.last_used_at.is_some());

    assert!(matches!(
        store.record_usage(Uuid::new_v4()).await,
        Err(DatabaseError::NotFound { .. })
    ));
    assert_eq!(store.list_benchmarks(coach).await.unwrap().len(), 1);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let (_container, store) = start().await;
    assert_ok!(store.run_migrations().await);
}

#[tokio::test]
async fn interactions_feed_stats() {
    let (_container, store) = start().await;
    let store = std::sync::Arc::new(store);
    let coach = Uuid::new_v4();
    store.save_benchmark(&bookkeeper(coach, dec!(60000))).await.unwrap();

    let advisor = Advisor::new()
        .with_benchmarks(store.clone())
        .with_interaction_log(store.clone());

    let ctx = EstimateContext::for_coach(coach);
    let from_coach = advisor
        .salary_estimate("bookkeeper", &ctx, &SalaryDetails::default())
        .await;
    let from_tables = advisor
        .salary_estimate("Receptionist", &ctx, &SalaryDetails::default())
        .await;
    assert_eq!(from_coach.source, SuggestionSource::CoachBenchmark);
    assert_eq!(from_tables.source, SuggestionSource::MarketData);

    let id = from_coach.interaction_id.unwrap();
    assert_ok!(store.record_action(id, SuggestionAction::Used, None).await);

    let stats = store.suggestion_stats(Some(coach)).await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.used, 1);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.acceptance_rate(), 1.0);
    assert_eq!(stats.by_source.len(), 2);

    let others = store.suggestion_stats(Some(Uuid::new_v4())).await.unwrap();
    assert_eq!(others.total, 0);

    let missing = InteractionRecord::new(
        EstimateKind::Salary,
        "ghost",
        EstimateContext::default(),
        serde_json::Value::Null,
        from_tables,
    );
    assert!(matches!(
        store
            .record_action(missing.id, SuggestionAction::Ignored, None)
            .await,
        Err(DatabaseError::NotFound { .. })
    ));
}
