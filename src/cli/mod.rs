//! Command-line interface.
//!
//! Estimates and validation work from the reference tables alone. Commands
//! that read or write coach data need `DATABASE_URL`.

mod benchmark;
mod output;

pub use benchmark::{BenchmarkCommand, run_benchmark_command};

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::Config;
use crate::db::{InteractionLog, SuggestionAction};
use crate::estimation::{Advisor, EstimateContext, ProjectDetails, SalaryDetails};
use crate::history::Store;
use crate::validation::{
    ForecastFigures, ForecastInputs, review_forecast, validate_forecast_inputs,
    validate_forecast_vs_goals, validate_formulas,
};

#[derive(Parser, Debug)]
#[command(name = "coach-advisor", version, about = "Estimates and forecast checks for business coaching")]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Suggest a salary range for a role
    Salary {
        role: String,

        /// e.g. "junior", "5 years", "senior"
        #[arg(long)]
        experience: Option<String>,

        /// City or state, e.g. "Sydney"
        #[arg(long)]
        location: Option<String>,

        #[command(flatten)]
        context: ContextArgs,
    },

    /// Suggest a cost range for a one-off project
    Project {
        project: String,

        #[arg(long)]
        scope: Option<String>,

        /// "simple", "medium" or "complex"
        #[arg(long)]
        complexity: Option<String>,

        #[command(flatten)]
        context: ContextArgs,
    },

    /// Report what was done with a logged suggestion
    Action {
        interaction_id: Uuid,

        /// used, adjusted, ignored or asked_coach
        action: SuggestionAction,

        /// The figure actually used
        #[arg(long)]
        value: Option<Decimal>,
    },

    /// Review forecast margins against industry benchmarks
    Review {
        #[arg(long)]
        revenue: f64,

        #[arg(long, default_value_t = 0.0)]
        cogs: f64,

        #[arg(long, default_value_t = 0.0)]
        team_costs: f64,

        #[arg(long, default_value_t = 0.0)]
        opex: f64,

        #[arg(long)]
        industry: Option<String>,
    },

    /// Compare a forecast total with the goal
    Goal {
        #[arg(long)]
        forecast: f64,

        #[arg(long)]
        goal: f64,

        /// Allowed relative difference, defaults to ADVISOR_GOAL_TOLERANCE
        #[arg(long)]
        tolerance: Option<f64>,
    },

    /// Check the headline forecast inputs
    Check {
        #[arg(long)]
        revenue_goal: f64,

        /// COGS as a percentage of revenue
        #[arg(long)]
        cogs: Option<f64>,

        #[arg(long)]
        forecast_total: Option<f64>,
    },

    /// Look for circular references, e.g. `formulas "A1==B1*2" "B1==A1"`
    Formulas {
        /// CELL=FORMULA pairs
        #[arg(required = true)]
        cells: Vec<String>,
    },

    /// Manage coach benchmarks
    #[command(subcommand)]
    Benchmark(BenchmarkCommand),

    /// Show how suggestions have been acted on
    Stats {
        #[arg(long)]
        coach: Option<Uuid>,
    },

    /// Apply database migrations
    Migrate,
}

/// Who is asking.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ContextArgs {
    /// Use this coach's benchmarks when they have one
    #[arg(long)]
    pub coach: Option<Uuid>,

    #[arg(long)]
    pub business: Option<Uuid>,

    #[arg(long)]
    pub user: Option<Uuid>,

    #[arg(long)]
    pub industry: Option<String>,

    /// Australian state or territory
    #[arg(long)]
    pub state: Option<String>,
}

impl From<ContextArgs> for EstimateContext {
    fn from(args: ContextArgs) -> Self {
        Self {
            business_id: args.business,
            user_id: args.user,
            coach_id: args.coach,
            industry: args.industry,
            revenue_range: None,
            state: args.state,
        }
    }
}

/// Run a parsed command.
pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let json = cli.json;

    match cli.command {
        Command::Salary {
            role,
            experience,
            location,
            context,
        } => {
            let advisor = advisor(&config).await;
            let details = SalaryDetails {
                experience,
                location,
            };
            let suggestion = advisor
                .salary_estimate(&role, &context.into(), &details)
                .await;
            output::emit(&suggestion, json, output::suggestion)
        }
        Command::Project {
            project,
            scope,
            complexity,
            context,
        } => {
            let advisor = advisor(&config).await;
            let details = ProjectDetails { scope, complexity };
            let suggestion = advisor
                .project_cost_estimate(&project, &context.into(), &details)
                .await;
            output::emit(&suggestion, json, output::suggestion)
        }
        Command::Action {
            interaction_id,
            action,
            value,
        } => {
            let store = connect(&config).await?;
            store.record_action(interaction_id, action, value).await?;
            output::emit(&serde_json::json!({ "recorded": action }), json, |_| {
                format!("Recorded '{}' for {}", action, interaction_id)
            })
        }
        Command::Review {
            revenue,
            cogs,
            team_costs,
            opex,
            industry,
        } => {
            let review = review_forecast(&ForecastFigures {
                revenue,
                cogs,
                team_costs,
                operating_expenses: opex,
                industry,
            });
            output::emit(&review, json, output::margin_review)
        }
        Command::Goal {
            forecast,
            goal,
            tolerance,
        } => {
            let tolerance = tolerance.unwrap_or(config.advisor.goal_tolerance);
            let issues: Vec<_> = validate_forecast_vs_goals(forecast, goal, tolerance)
                .into_iter()
                .collect();
            output::emit(&issues, json, |i| output::issues(i))
        }
        Command::Check {
            revenue_goal,
            cogs,
            forecast_total,
        } => {
            let issues = validate_forecast_inputs(&ForecastInputs {
                revenue_goal,
                cogs_percentage: cogs,
                forecast_total,
                goal_tolerance: Some(config.advisor.goal_tolerance),
            });
            output::emit(&issues, json, |i| output::issues(i))
        }
        Command::Formulas { cells } => {
            let formulas = parse_cells(&cells)?;
            let issues = validate_formulas(&formulas, &HashMap::new());
            output::emit(&issues, json, |i| output::issues(i))
        }
        Command::Benchmark(cmd) => {
            let store = connect(&config).await?;
            run_benchmark_command(cmd, &*store, json).await
        }
        Command::Stats { coach } => {
            let store = connect(&config).await?;
            let stats = store.suggestion_stats(coach).await?;
            output::emit(&stats, json, output::stats)
        }
        Command::Migrate => {
            let store = connect(&config).await?;
            store.run_migrations().await?;
            output::emit(&serde_json::json!({ "migrated": true }), json, |_| {
                "Migrations applied.".to_string()
            })
        }
    }
}

async fn connect(config: &Config) -> anyhow::Result<Arc<Store>> {
    let db = config.require_database()?;
    let store = Store::new(db)
        .await
        .context("failed to connect to the database")?;
    Ok(Arc::new(store))
}

/// Build an advisor, wiring in the database when one is configured and
/// reachable.
async fn advisor(config: &Config) -> Advisor {
    let advisor = Advisor::new();
    let Some(db) = &config.database else {
        tracing::debug!("No database configured, using reference tables only");
        return advisor;
    };

    let store = match Store::new(db).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!("Database unavailable, using reference tables only: {}", e);
            return advisor;
        }
    };

    let advisor = advisor.with_benchmarks(store.clone());
    if config.advisor.log_interactions {
        advisor.with_interaction_log(store)
    } else {
        advisor
    }
}

/// Split `CELL=FORMULA` arguments. The cell id is uppercased.
fn parse_cells(cells: &[String]) -> anyhow::Result<HashMap<String, String>> {
    cells
        .iter()
        .map(|pair| {
            let (cell, formula) = pair
                .split_once('=')
                .with_context(|| format!("expected CELL=FORMULA, got '{}'", pair))?;
            let cell = cell.trim();
            if cell.is_empty() {
                anyhow::bail!("missing cell id in '{}'", pair);
            }
            Ok((cell.to_uppercase(), formula.trim().to_string()))
        })
        .collect()
}
