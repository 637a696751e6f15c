//! # Data Loader Crate
//!
//! Loads MovieLens ratings and movies into memory and serves them through the
//! [`RatingsProvider`] trait.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Rating, Movie, DataIndex)
//! - **parser**: Parse `.dat` and `.csv` files into Rust structs
//! - **index**: Load a dataset directory into a validated DataIndex
//! - **provider**: The three reads the recommender depends on
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{DataIndex, RatingsProvider};
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_dir(Path::new("data/ml-latest-small"))?;
//! let ratings = index.fetch_all_ratings()?;
//! let title = index.fetch_movie_title(1)?;
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;
pub mod provider;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::DatasetFormat;
pub use provider::RatingsProvider;
pub use types::{DataIndex, Movie, MovieId, Rating, UserId, MAX_RATING, MIN_RATING};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_index_creation() {
        let index = DataIndex::new();
        let (users, movies, ratings) = index.counts();

        assert_eq!(users, 0);
        assert_eq!(movies, 0);
        assert_eq!(ratings, 0);
    }

    #[test]
    fn test_insert_movie() {
        let mut index = DataIndex::new();

        index.insert_movie(Movie {
            id: 1,
            title: "Toy Story (1995)".to_string(),
            genres: "Animation|Children's|Comedy".to_string(),
        });

        let retrieved = index.get_movie(1).unwrap();
        assert_eq!(retrieved.id, 1);
        assert_eq!(retrieved.genres, "Animation|Children's|Comedy");
    }

    #[test]
    fn test_insert_rating() {
        let mut index = DataIndex::new();

        index.insert_rating(Rating {
            user_id: 1,
            movie_id: 1193,
            rating: 5.0,
            timestamp: 978300760,
        });

        let user_ratings = index.get_user_ratings(1);
        assert_eq!(user_ratings.len(), 1);
        assert_eq!(user_ratings[0].rating, 5.0);
        assert_eq!(index.ratings().len(), 1);
    }

    #[test]
    fn test_empty_queries() {
        let index = DataIndex::new();

        assert!(index.get_movie(999).is_none());
        assert!(index.get_user_ratings(999).is_empty());
    }
}
