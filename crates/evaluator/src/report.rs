//! Result of one evaluation run.

use crate::config::EvaluationConfig;
use serde::Serialize;

/// The five offline metrics plus enough context to reproduce them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// Share of held-out ratings found anywhere in the user's list
    pub hit_rate: f64,
    /// Mean reciprocal rank of held-out ratings, 0 for a miss
    pub average_reciprocal_hit_rate: f64,
    /// Fraction of the catalog recommended to anyone
    pub coverage: f64,
    /// Mean Gini-Simpson genre diversity per user
    pub diversity: f64,
    /// Mean self-information of recommended movies per user
    pub novelty: f64,
    pub users_evaluated: usize,
    pub held_out_entries: usize,
    pub config: EvaluationConfig,
}

impl EvaluationReport {
    /// All-zero report for a run with no data
    pub fn empty(config: EvaluationConfig) -> Self {
        Self {
            hit_rate: 0.0,
            average_reciprocal_hit_rate: 0.0,
            coverage: 0.0,
            diversity: 0.0,
            novelty: 0.0,
            users_evaluated: 0,
            held_out_entries: 0,
            config,
        }
    }

    /// Coverage as a percentage, the way it is usually quoted
    pub fn coverage_percent(&self) -> f64 {
        self.coverage * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_percent() {
        let mut report = EvaluationReport::empty(EvaluationConfig::default());
        report.coverage = 0.125;
        assert_eq!(report.coverage_percent(), 12.5);
    }

    #[test]
    fn test_report_serializes_with_config() {
        let report = EvaluationReport::empty(EvaluationConfig::default());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["hit_rate"], 0.0);
        assert_eq!(json["config"]["catalog_size"], 9737);
        assert_eq!(json["config"]["recommender"]["top_n"], 10);
    }
}
