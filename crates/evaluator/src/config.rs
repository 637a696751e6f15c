//! Settings for an offline evaluation run.

use recommender::RecommenderConfig;
use serde::{Deserialize, Serialize};

/// Catalog size, split seed and the recommender settings under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Number of movies in the full catalog, the denominator of coverage
    pub catalog_size: usize,
    /// Seed for the leave-one-out split
    pub loocv_seed: u64,
    pub recommender: RecommenderConfig,
}

impl EvaluationConfig {
    /// Movies in the ml-latest-small catalog
    pub const DEFAULT_CATALOG_SIZE: usize = 9737;
    pub const DEFAULT_LOOCV_SEED: u64 = 1;

    pub fn with_catalog_size(mut self, catalog_size: usize) -> Self {
        self.catalog_size = catalog_size;
        self
    }

    pub fn with_loocv_seed(mut self, seed: u64) -> Self {
        self.loocv_seed = seed;
        self
    }

    pub fn with_recommender(mut self, recommender: RecommenderConfig) -> Self {
        self.recommender = recommender;
        self
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            catalog_size: Self::DEFAULT_CATALOG_SIZE,
            loocv_seed: Self::DEFAULT_LOOCV_SEED,
            recommender: RecommenderConfig::default(),
        }
    }
}
