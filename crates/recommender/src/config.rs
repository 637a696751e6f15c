//! Tunables for the user-based recommender.

use serde::{Deserialize, Serialize};

/// How many movies to return and how many neighbors to consult
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Length of a recommendation list
    pub top_n: usize,
    /// Number of most similar users whose ratings are aggregated
    pub neighbor_count: usize,
}

impl RecommenderConfig {
    pub const DEFAULT_TOP_N: usize = 10;
    pub const DEFAULT_NEIGHBOR_COUNT: usize = 5;

    /// Configure the recommendation list length (default: 10)
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Configure the neighbor count (default: 5)
    pub fn with_neighbor_count(mut self, neighbor_count: usize) -> Self {
        self.neighbor_count = neighbor_count;
        self
    }
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            top_n: Self::DEFAULT_TOP_N,
            neighbor_count: Self::DEFAULT_NEIGHBOR_COUNT,
        }
    }
}
