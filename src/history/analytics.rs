//! Aggregates over the interaction log.
//!
//! Analytics methods are implemented directly on [`Store`] for convenience.

use serde::Serialize;
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::history::Store;

/// How suggestions were acted on.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuggestionStats {
    pub total: u64,
    pub used: u64,
    pub adjusted: u64,
    pub ignored: u64,
    pub asked_coach: u64,
    /// Suggestions with no recorded action yet.
    pub pending: u64,
    pub by_source: Vec<SourceStats>,
}

impl SuggestionStats {
    /// Share of actioned suggestions that were used as given or adjusted.
    pub fn acceptance_rate(&self) -> f64 {
        acceptance(self.used + self.adjusted, self.total.saturating_sub(self.pending))
    }
}

/// Per-source breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceStats {
    pub source: String,
    pub total: u64,
    pub accepted: u64,
    pub acceptance_rate: f64,
}

fn acceptance(accepted: u64, actioned: u64) -> f64 {
    if actioned > 0 {
        accepted as f64 / actioned as f64
    } else {
        0.0
    }
}

impl Store {
    /// Get suggestion statistics, optionally for one coach.
    pub async fn suggestion_stats(
        &self,
        coach_id: Option<Uuid>,
    ) -> Result<SuggestionStats, DatabaseError> {
        let conn = self.conn().await?;

        let row = conn
            .query_one(
                r#"
                SELECT
                    COUNT(*) as total,
                    COUNT(*) FILTER (WHERE action_taken = 'used') as used,
                    COUNT(*) FILTER (WHERE action_taken = 'adjusted') as adjusted,
                    COUNT(*) FILTER (WHERE action_taken = 'ignored') as ignored,
                    COUNT(*) FILTER (WHERE action_taken = 'asked_coach') as asked_coach,
                    COUNT(*) FILTER (WHERE action_taken IS NULL) as pending
                FROM ai_interactions
                WHERE ($1::uuid IS NULL OR coach_id = $1)
                "#,
                &[&coach_id],
            )
            .await?;

        let rows = conn
            .query(
                r#"
                SELECT
                    source,
                    COUNT(*) as total,
                    COUNT(*) FILTER (WHERE action_taken IN ('used', 'adjusted')) as accepted,
                    COUNT(*) FILTER (WHERE action_taken IS NOT NULL) as actioned
                FROM ai_interactions
                WHERE ($1::uuid IS NULL OR coach_id = $1)
                GROUP BY source
                ORDER BY total DESC
                "#,
                &[&coach_id],
            )
            .await?;

        let by_source = rows
            .iter()
            .map(|row| {
                let accepted: i64 = row.get("accepted");
                let actioned: i64 = row.get("actioned");
                SourceStats {
                    source: row.get("source"),
                    total: row.get::<_, i64>("total") as u64,
                    accepted: accepted as u64,
                    acceptance_rate: acceptance(accepted as u64, actioned as u64),
                }
            })
            .collect();

        let count = |name: &str| row.get::<_, i64>(name) as u64;
        Ok(SuggestionStats {
            total: count("total"),
            used: count("used"),
            adjusted: count("adjusted"),
            ignored: count("ignored"),
            asked_coach: count("asked_coach"),
            pending: count("pending"),
            by_source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acceptance_rate_ignores_pending() {
        let stats = SuggestionStats {
            total: 10,
            used: 3,
            adjusted: 1,
            ignored: 2,
            asked_coach: 2,
            pending: 2,
            by_source: Vec::new(),
        };
        assert_eq!(stats.acceptance_rate(), 0.5);
    }

    #[test]
    fn test_acceptance_rate_empty() {
        assert_eq!(SuggestionStats::default().acceptance_rate(), 0.0);
    }
}
