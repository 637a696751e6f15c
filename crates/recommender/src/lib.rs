//! # Recommender Crate
//!
//! Memory-based (user-to-user) collaborative filtering over a fixed ratings
//! dataset.
//!
//! ## Components
//!
//! - **matrix**: dense user-by-movie rating matrix, `0.0` for unrated cells
//! - **similarity**: cosine similarity between users and neighbor lookup
//! - **recommend**: neighbor-weighted scoring and top-N ranking
//! - **config**: list length and neighbor count
//!
//! ## Example Usage
//!
//! ```ignore
//! use recommender::{build_rating_matrix, build_similarity_matrix, generate_recommendations, RecommenderConfig};
//!
//! let matrix = build_rating_matrix(&ratings).expect("no ratings");
//! let similarity = build_similarity_matrix(&matrix).expect("empty matrix");
//! let top = generate_recommendations(1, true, &matrix, &similarity, &RecommenderConfig::default());
//! ```
//!
//! Building the similarity matrix is the expensive step; batch callers build
//! it once and pass it to every per-user call.

pub mod config;
pub mod matrix;
pub mod similarity;
pub mod recommend;

pub use config::RecommenderConfig;
pub use matrix::{RatingMatrix, build_rating_matrix};
pub use recommend::{UserBasedRecommender, generate_recommendations, rank_movies, score_movies};
pub use similarity::{Neighbor, SimilarityMatrix, build_similarity_matrix};
