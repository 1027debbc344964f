//! Coach benchmark CLI commands.
//!
//! Commands for saving and listing a coach's overrides of the reference
//! ranges.

use clap::Subcommand;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::output;
use crate::db::{BenchmarkInput, BenchmarkStore, EstimateKind};
use crate::estimation::benchmark_category;

#[derive(Subcommand, Debug, Clone)]
pub enum BenchmarkCommand {
    /// Create or replace a benchmark
    Set {
        /// Coach the benchmark belongs to
        #[arg(long)]
        coach: Uuid,

        /// "salary" or "project_cost"
        #[arg(long, default_value = "salary")]
        kind: EstimateKind,

        /// Role or project type, e.g. "Bookkeeper" or "CRM setup"
        category: String,

        #[arg(long)]
        min: Decimal,

        #[arg(long)]
        typical: Decimal,

        #[arg(long)]
        max: Decimal,

        /// Shown to clients alongside the range
        #[arg(long)]
        notes: Option<String>,
    },

    /// List a coach's benchmarks
    List {
        #[arg(long)]
        coach: Uuid,
    },
}

/// Run a benchmark command.
pub async fn run_benchmark_command(
    cmd: BenchmarkCommand,
    store: &dyn BenchmarkStore,
    json: bool,
) -> anyhow::Result<()> {
    match cmd {
        BenchmarkCommand::Set {
            coach,
            kind,
            category,
            min,
            typical,
            max,
            notes,
        } => {
            let input = BenchmarkInput {
                coach_id: coach,
                kind,
                category: benchmark_category(kind, &category),
                min_value: min,
                max_value: max,
                typical_value: typical,
                notes,
            };
            let saved = store.save_benchmark(&input).await?;
            output::emit(&saved, json, |b| {
                format!("Saved {} benchmark for {}", b.kind, b.category)
            })
        }
        BenchmarkCommand::List { coach } => {
            let list = store.list_benchmarks(coach).await?;
            output::emit(&list, json, |l| output::benchmarks(l))
        }
    }
}
