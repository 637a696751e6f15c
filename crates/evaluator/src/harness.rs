//! Batch recommendation generation and the full evaluation run.
//!
//! The rating and similarity matrices are built once and shared by every
//! per-user call; that is where nearly all of the time goes.

use crate::config::EvaluationConfig;
use crate::metrics::{
    GenreMap, average_gini_simpson_diversity, average_novelty, average_reciprocal_hit_rate,
    coverage, hit_rate,
};
use crate::report::EvaluationReport;
use crate::split::{HeldOutEntry, HeldOutRating, leave_one_out_split};
use data_loader::{MovieId, RatingsProvider, UserId};
use rayon::prelude::*;
use recommender::{
    RatingMatrix, RecommenderConfig, SimilarityMatrix, UserBasedRecommender,
    build_similarity_matrix, generate_recommendations,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// User id to that user's ranked recommendations, ordered by user id
pub type RecommendationMap = BTreeMap<UserId, Vec<MovieId>>;

/// Recommendations for every user in the matrix, from shared matrices
///
/// Users with no neighbors or nothing to recommend are left out rather than
/// mapped to an empty list. Users are processed in parallel; the result does
/// not depend on scheduling.
pub fn recommendations_for_all_users(
    matrix: &RatingMatrix,
    similarity: &SimilarityMatrix,
    exclude_watched: bool,
    config: &RecommenderConfig,
) -> RecommendationMap {
    matrix
        .users()
        .par_iter()
        .filter_map(|&user_id| {
            generate_recommendations(user_id, exclude_watched, matrix, similarity, config)
                .filter(|list| !list.is_empty())
                .map(|list| (user_id, list))
        })
        .collect()
}

/// Runs the recommender over a whole dataset and scores the output
pub struct Evaluator {
    recommender: UserBasedRecommender,
    config: EvaluationConfig,
}

impl Evaluator {
    /// Create an evaluator with default settings
    pub fn new(provider: Arc<dyn RatingsProvider>) -> Self {
        let config = EvaluationConfig::default();
        Self {
            recommender: UserBasedRecommender::new(provider).with_config(config.recommender),
            config,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: EvaluationConfig) -> Self {
        self.recommender = self.recommender.with_config(config.recommender);
        self.config = config;
        self
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    fn build_matrices(&self) -> Option<(RatingMatrix, SimilarityMatrix)> {
        let start = Instant::now();
        let matrix = self.recommender.build_rating_matrix()?;
        let similarity = build_similarity_matrix(&matrix)?;
        info!(
            "Built {}x{} rating matrix and similarity matrix in {:.2?}",
            matrix.n_users(),
            matrix.n_movies(),
            start.elapsed()
        );
        Some((matrix, similarity))
    }

    /// Recommendations for every user in the dataset
    ///
    /// Empty when the dataset cannot be loaded.
    #[instrument(skip(self))]
    pub fn generate_recommendations_for_all_users(&self, exclude_watched: bool) -> RecommendationMap {
        match self.build_matrices() {
            Some((matrix, similarity)) => recommendations_for_all_users(
                &matrix,
                &similarity,
                exclude_watched,
                &self.config.recommender,
            ),
            None => RecommendationMap::new(),
        }
    }

    /// One held-out rating per user, chosen with the configured seed
    #[instrument(skip(self))]
    pub fn generate_loocv_test_data(&self) -> Vec<HeldOutRating> {
        match self.recommender.provider().fetch_all_ratings() {
            Ok(ratings) => leave_one_out_split(&ratings, self.config.loocv_seed).test,
            Err(e) => {
                warn!("Failed to fetch ratings for leave-one-out split: {}", e);
                Vec::new()
            }
        }
    }

    /// Genre tags for every known movie
    pub fn movie_genre_map(&self) -> Option<GenreMap> {
        match self.recommender.provider().fetch_movie_genre_map() {
            Ok(raw) => raw.map(GenreMap::from_delimited),
            Err(e) => {
                warn!("Failed to fetch movie genres: {}", e);
                None
            }
        }
    }

    /// Full run against a freshly generated leave-one-out test set
    pub fn evaluate(&self) -> EvaluationReport {
        let held_out = self.generate_loocv_test_data();
        self.evaluate_against(&held_out)
    }

    /// Full run against a caller-supplied held-out set
    ///
    /// Hit rate and ARHR score recommendations that may include watched
    /// movies, since the held-out movie is itself one the user rated.
    /// Coverage, diversity and novelty score the lists a user would
    /// actually see, with watched movies removed.
    #[instrument(skip(self, held_out), fields(held_out = held_out.len()))]
    pub fn evaluate_against<E: HeldOutEntry>(&self, held_out: &[E]) -> EvaluationReport {
        let Some((matrix, similarity)) = self.build_matrices() else {
            warn!("No ratings available, nothing to evaluate");
            return EvaluationReport::empty(self.config);
        };
        let recommender_config = &self.config.recommender;

        let inclusive = recommendations_for_all_users(&matrix, &similarity, false, recommender_config);
        let exclusive = recommendations_for_all_users(&matrix, &similarity, true, recommender_config);
        info!(
            "Generated recommendations for {} users ({} with watched movies excluded)",
            inclusive.len(),
            exclusive.len()
        );

        let genres = self.movie_genre_map();
        if genres.is_none() {
            warn!("No genre data, diversity will be 0");
        }

        EvaluationReport {
            hit_rate: hit_rate(&inclusive, held_out),
            average_reciprocal_hit_rate: average_reciprocal_hit_rate(&inclusive, held_out),
            coverage: coverage(&exclusive, self.config.catalog_size),
            diversity: average_gini_simpson_diversity(&exclusive, genres.as_ref()),
            novelty: average_novelty(&exclusive),
            users_evaluated: exclusive.len(),
            held_out_entries: held_out.len(),
            config: self.config,
        }
    }
}
