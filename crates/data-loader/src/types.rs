//! Core domain types for the MovieLens dataset.
//!
//! This module defines the fundamental data structures used throughout the system:
//! - Type aliases for domain clarity (UserId, MovieId)
//! - Rating triples as they come out of the ratings file
//! - Movies with their display title and raw genre string
//! - The in-memory `DataIndex` that serves every read the recommender needs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user IDs with movie IDs

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a movie
pub type MovieId = u32;

/// Lowest rating a MovieLens user can give.
pub const MIN_RATING: f32 = 0.5;

/// Highest rating a MovieLens user can give.
pub const MAX_RATING: f32 = 5.0;

// =============================================================================
// Movie
// =============================================================================

/// Represents a movie in the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    /// Display title, usually with the release year: "Toy Story (1995)"
    pub title: String,
    /// Pipe-separated genre tags exactly as stored: "Animation|Children's|Comedy"
    pub genres: String,
}

// =============================================================================
// Rating Type
// =============================================================================

/// A single (user, movie, rating) triple
///
/// Immutable once read. At most one rating exists per (user, movie) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Rating value from 0.5 to 5.0
    pub rating: f32,
    /// Unix timestamp when rating was made
    pub timestamp: i64,
}

impl Rating {
    /// Build a rating without a timestamp
    pub fn new(user_id: UserId, movie_id: MovieId, rating: f32) -> Self {
        Self {
            user_id,
            movie_id,
            rating,
            timestamp: 0,
        }
    }

    /// Whether the value lies in the MovieLens rating scale
    pub fn in_scale(&self) -> bool {
        (MIN_RATING..=MAX_RATING).contains(&self.rating)
    }
}

// =============================================================================
// DataIndex - The In-Memory Ratings Store
// =============================================================================

/// Holds every movie and rating loaded from disk.
///
/// Ratings are kept in load order; a per-user index gives O(1) access to one
/// user's history.
#[derive(Debug, Clone)]
pub struct DataIndex {
    pub(crate) movies: HashMap<MovieId, Movie>,
    pub(crate) ratings: Vec<Rating>,
    /// All ratings made by each user
    pub(crate) user_ratings: HashMap<UserId, Vec<Rating>>,
}

impl DataIndex {
    /// Creates a new, empty DataIndex
    pub fn new() -> Self {
        Self {
            movies: HashMap::new(),
            ratings: Vec::new(),
            user_ratings: HashMap::new(),
        }
    }

    /// Get a movie by ID
    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(&id)
    }

    /// Every rating in load order
    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    /// Get all ratings made by a user
    ///
    /// Returns an empty slice if user has no ratings
    pub fn get_user_ratings(&self, user_id: UserId) -> &[Rating] {
        self.user_ratings
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Insert a movie into the index
    pub fn insert_movie(&mut self, movie: Movie) {
        self.movies.insert(movie.id, movie);
    }

    /// Insert a rating and update indices
    pub fn insert_rating(&mut self, rating: Rating) {
        self.user_ratings
            .entry(rating.user_id)
            .or_insert_with(Vec::new)
            .push(rating);
        self.ratings.push(rating);
    }

    /// Get counts for debugging/validation: (users, movies, ratings)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.user_ratings.len(), self.movies.len(), self.ratings.len())
    }
}

impl Default for DataIndex {
    fn default() -> Self {
        Self::new()
    }
}
