//! # Evaluator Crate
//!
//! Offline evaluation of the user-based recommender.
//!
//! ## Components
//!
//! - **split**: seeded leave-one-out test set, one held-out rating per user
//! - **harness**: recommendations for every user from one pair of shared
//!   matrices, and the `Evaluator` that runs a full evaluation
//! - **metrics**: hit rate, average reciprocal hit rate, coverage,
//!   Gini-Simpson diversity, novelty
//! - **report**: serializable summary of a run
//!
//! ## Example Usage
//!
//! ```ignore
//! use evaluator::{Evaluator, EvaluationConfig};
//! use std::sync::Arc;
//!
//! let evaluator = Evaluator::new(Arc::new(data_index)).with_config(EvaluationConfig::default());
//! let report = evaluator.evaluate();
//! println!("Hit rate: {}", report.hit_rate);
//! ```

pub mod config;
pub mod split;
pub mod metrics;
pub mod harness;
pub mod report;

pub use config::EvaluationConfig;
pub use harness::{Evaluator, RecommendationMap, recommendations_for_all_users};
pub use metrics::{
    GenreMap, average_gini_simpson_diversity, average_novelty, average_novelty_for_list,
    average_reciprocal_hit_rate, coverage, gini_simpson_diversity, hit_rate, movie_popularity,
};
pub use report::EvaluationReport;
pub use split::{HeldOutEntry, HeldOutRating, LeaveOneOutSplit, RawHeldOut, leave_one_out_split};
