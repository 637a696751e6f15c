//! User-based collaborative filtering recommendations.
//!
//! ## Algorithm
//! 1. Find the target user's most similar users (neighbors)
//! 2. For every movie a neighbor rated, add `rating * similarity` to that
//!    movie's score, skipping the target's own movies when asked to
//! 3. Rank movies by accumulated score and keep the top N

use crate::config::RecommenderConfig;
use crate::matrix::{RatingMatrix, build_rating_matrix};
use crate::similarity::{Neighbor, SimilarityMatrix, build_similarity_matrix};
use data_loader::{MovieId, RatingsProvider, UserId};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Accumulate neighbor-weighted scores per movie
///
/// Only nonzero contributions are accumulated. A movie nobody in the
/// neighborhood rated, or rated only by neighbors with zero similarity,
/// never appears in the result.
pub fn score_movies(
    matrix: &RatingMatrix,
    neighbors: &[Neighbor],
    excluded: &HashSet<MovieId>,
) -> HashMap<MovieId, f64> {
    let mut scores: HashMap<MovieId, f64> = HashMap::new();
    for neighbor in neighbors {
        let Some(row) = matrix.user_position(neighbor.user_id) else {
            continue;
        };
        for (movie_id, rating) in matrix.rated_in_row(row) {
            if excluded.contains(&movie_id) {
                continue;
            }
            let contribution = rating as f64 * neighbor.score;
            if contribution == 0.0 {
                continue;
            }
            *scores.entry(movie_id).or_insert(0.0) += contribution;
        }
    }
    scores
}

/// Sort scored movies (score descending, movie id ascending) and keep `top_n`
pub fn rank_movies(scores: HashMap<MovieId, f64>, top_n: usize) -> Vec<MovieId> {
    let mut ranked: Vec<(MovieId, f64)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked.truncate(top_n);
    ranked.into_iter().map(|(movie_id, _)| movie_id).collect()
}

/// Top-N movie ids for one user from prebuilt matrices
///
/// Returns `None` when the user has no neighbors to draw from. With
/// `exclude_watched` set, nothing the user already rated is returned.
pub fn generate_recommendations(
    user_id: UserId,
    exclude_watched: bool,
    matrix: &RatingMatrix,
    similarity: &SimilarityMatrix,
    config: &RecommenderConfig,
) -> Option<Vec<MovieId>> {
    let neighbors = similarity.top_similar_users(user_id, config.neighbor_count);
    if neighbors.is_empty() {
        debug!("No neighbors for user {}", user_id);
        return None;
    }

    let excluded = if exclude_watched {
        matrix.watched_movies(user_id)
    } else {
        HashSet::new()
    };

    let scores = score_movies(matrix, &neighbors, &excluded);
    debug!(
        "Scored {} movies from {} neighbors for user {}",
        scores.len(),
        neighbors.len(),
        user_id
    );
    Some(rank_movies(scores, config.top_n))
}

/// Recommender that can fetch its own data when matrices aren't supplied
#[derive(Clone)]
pub struct UserBasedRecommender {
    /// Shared, read-only ratings source
    provider: Arc<dyn RatingsProvider>,
    config: RecommenderConfig,
}

impl UserBasedRecommender {
    /// Create a recommender with default settings
    pub fn new(provider: Arc<dyn RatingsProvider>) -> Self {
        Self {
            provider,
            config: RecommenderConfig::default(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: RecommenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn provider(&self) -> &Arc<dyn RatingsProvider> {
        &self.provider
    }

    /// Fetch every rating and build the matrix
    ///
    /// A failed fetch is logged and treated like an empty dataset.
    pub fn build_rating_matrix(&self) -> Option<RatingMatrix> {
        let ratings = match self.provider.fetch_all_ratings() {
            Ok(ratings) => ratings,
            Err(e) => {
                warn!("Failed to fetch ratings: {}", e);
                return None;
            }
        };
        if ratings.is_empty() {
            warn!("Ratings source returned no ratings");
        }
        build_rating_matrix(&ratings)
    }

    /// Recommendations for one user, building everything from the provider
    pub fn recommend(&self, user_id: UserId, exclude_watched: bool) -> Option<Vec<MovieId>> {
        self.recommend_with(user_id, exclude_watched, None, None)
    }

    /// Recommendations for one user, reusing matrices when given
    ///
    /// A missing or empty matrix is rebuilt: the rating matrix from the
    /// provider, the similarity matrix from the rating matrix. If either is
    /// still unavailable the result is `None`.
    #[instrument(skip(self, matrix, similarity))]
    pub fn recommend_with(
        &self,
        user_id: UserId,
        exclude_watched: bool,
        matrix: Option<&RatingMatrix>,
        similarity: Option<&SimilarityMatrix>,
    ) -> Option<Vec<MovieId>> {
        let matrix = match matrix {
            Some(m) if !m.is_empty() => Cow::Borrowed(m),
            _ => Cow::Owned(self.build_rating_matrix()?),
        };
        let similarity = match similarity {
            Some(s) if !s.is_empty() => Cow::Borrowed(s),
            _ => Cow::Owned(build_similarity_matrix(&matrix)?),
        };
        generate_recommendations(user_id, exclude_watched, &matrix, &similarity, &self.config)
    }

    /// The configured number of most similar users for `user_id`
    pub fn similar_users(&self, user_id: UserId) -> Vec<Neighbor> {
        self.build_rating_matrix()
            .and_then(|matrix| build_similarity_matrix(&matrix))
            .map(|similarity| similarity.top_similar_users(user_id, self.config.neighbor_count))
            .unwrap_or_default()
    }
}
