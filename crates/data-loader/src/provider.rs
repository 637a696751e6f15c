//! The read interface the recommender and evaluator consume.
//!
//! Anything that can hand over the full ratings set, a movie title, and the
//! genre strings can back a recommender. `DataIndex` is the in-memory
//! implementation; tests build one by hand.

use crate::error::Result;
use crate::types::{DataIndex, MovieId, Rating};
use std::collections::HashMap;

/// Source of ratings and movie metadata.
///
/// `Send + Sync` so one provider can be shared behind an `Arc`.
pub trait RatingsProvider: Send + Sync {
    /// Every (user, movie, rating) triple in the dataset
    fn fetch_all_ratings(&self) -> Result<Vec<Rating>>;

    /// Display title for a movie, `None` for an invalid or unknown id
    fn fetch_movie_title(&self, movie_id: MovieId) -> Result<Option<String>>;

    /// Movie id to pipe-delimited genre string, `None` if no movies are known
    fn fetch_movie_genre_map(&self) -> Result<Option<HashMap<MovieId, String>>>;
}

impl RatingsProvider for DataIndex {
    fn fetch_all_ratings(&self) -> Result<Vec<Rating>> {
        Ok(self.ratings.clone())
    }

    fn fetch_movie_title(&self, movie_id: MovieId) -> Result<Option<String>> {
        if movie_id == 0 {
            return Ok(None);
        }
        Ok(self.get_movie(movie_id).map(|movie| movie.title.clone()))
    }

    fn fetch_movie_genre_map(&self) -> Result<Option<HashMap<MovieId, String>>> {
        if self.movies.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            self.movies
                .values()
                .map(|movie| (movie.id, movie.genres.clone()))
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Movie;

    fn create_test_index() -> DataIndex {
        let mut index = DataIndex::new();
        index.insert_movie(Movie {
            id: 1,
            title: "Toy Story (1995)".to_string(),
            genres: "Adventure|Animation|Children|Comedy|Fantasy".to_string(),
        });
        index.insert_rating(Rating::new(7, 1, 4.0));
        index.insert_rating(Rating::new(8, 2, 3.5));
        index
    }

    #[test]
    fn test_fetch_all_ratings_in_load_order() {
        let index = create_test_index();
        let ratings = index.fetch_all_ratings().unwrap();
        assert_eq!(ratings, vec![Rating::new(7, 1, 4.0), Rating::new(8, 2, 3.5)]);
    }

    #[test]
    fn test_fetch_movie_title() {
        let index = create_test_index();
        assert_eq!(index.fetch_movie_title(1).unwrap().as_deref(), Some("Toy Story (1995)"));
        assert_eq!(index.fetch_movie_title(2).unwrap(), None);
        assert_eq!(index.fetch_movie_title(0).unwrap(), None);
    }

    #[test]
    fn test_fetch_movie_genre_map() {
        let index = create_test_index();
        let genres = index.fetch_movie_genre_map().unwrap().unwrap();
        assert_eq!(genres[&1], "Adventure|Animation|Children|Comedy|Fantasy");

        assert!(DataIndex::new().fetch_movie_genre_map().unwrap().is_none());
    }
}
