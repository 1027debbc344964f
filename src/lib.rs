//! Salary and project cost estimation, margin benchmarks and forecast
//! validation for business coaching.
//!
//! The [`estimation::Advisor`] answers "what should this cost?" questions from
//! a coach's own benchmarks or the built-in reference guides. The
//! [`validation`] module checks forecast inputs without ever failing.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod estimation;
pub mod history;
pub mod validation;

pub use config::Config;
pub use error::{ConfigError, DatabaseError};
pub use estimation::{Advisor, Suggestion};
