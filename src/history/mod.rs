//! PostgreSQL persistence.
//!
//! Implements the benchmark store and interaction log against the
//! `coach_benchmarks` and `ai_interactions` tables, plus:
//! - embedded schema migrations
//! - suggestion analytics

mod analytics;
mod store;

pub use analytics::{SourceStats, SuggestionStats};
pub use store::Store;
