//! User-by-movie rating matrix.
//!
//! Dense, row-major, one row per user and one column per movie seen anywhere
//! in the ratings. A cell holding `0.0` means "not rated": real ratings are
//! never below 0.5.

use data_loader::{MovieId, Rating, UserId};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Dense rating matrix keyed by (user, movie)
///
/// Rows and columns are ordered by ascending id.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingMatrix {
    users: Vec<UserId>,
    movies: Vec<MovieId>,
    user_index: HashMap<UserId, usize>,
    movie_index: HashMap<MovieId, usize>,
    cells: Vec<f32>,
}

/// Build the rating matrix from raw triples
///
/// Returns `None` for an empty input; an absent matrix is a hard stop for
/// callers. If a (user, movie) pair occurs twice the later rating wins.
pub fn build_rating_matrix(ratings: &[Rating]) -> Option<RatingMatrix> {
    if ratings.is_empty() {
        return None;
    }

    let users: Vec<UserId> = ratings
        .iter()
        .map(|r| r.user_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let movies: Vec<MovieId> = ratings
        .iter()
        .map(|r| r.movie_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut matrix = RatingMatrix::empty(users, movies);
    for rating in ratings {
        let row = matrix.user_index[&rating.user_id];
        let col = matrix.movie_index[&rating.movie_id];
        let width = matrix.movies.len();
        matrix.cells[row * width + col] = rating.rating;
    }

    debug!(
        "Built rating matrix: {} users x {} movies from {} ratings",
        matrix.n_users(),
        matrix.n_movies(),
        ratings.len()
    );
    Some(matrix)
}

impl RatingMatrix {
    fn empty(users: Vec<UserId>, movies: Vec<MovieId>) -> Self {
        let user_index = users.iter().enumerate().map(|(i, &u)| (u, i)).collect();
        let movie_index = movies.iter().enumerate().map(|(i, &m)| (m, i)).collect();
        let cells = vec![0.0; users.len() * movies.len()];
        Self {
            users,
            movies,
            user_index,
            movie_index,
            cells,
        }
    }

    /// Build a matrix from explicit labels and row-major cells
    ///
    /// Returns `None` when the cell count does not match the labels or a
    /// label repeats.
    pub fn from_dense(users: Vec<UserId>, movies: Vec<MovieId>, cells: Vec<f32>) -> Option<Self> {
        if cells.len() != users.len() * movies.len() {
            return None;
        }
        let mut matrix = Self::empty(users, movies);
        if matrix.user_index.len() != matrix.users.len()
            || matrix.movie_index.len() != matrix.movies.len()
        {
            return None;
        }
        matrix.cells = cells;
        Some(matrix)
    }

    /// Row labels
    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    /// Column labels
    pub fn movies(&self) -> &[MovieId] {
        &self.movies
    }

    pub fn n_users(&self) -> usize {
        self.users.len()
    }

    pub fn n_movies(&self) -> usize {
        self.movies.len()
    }

    /// True when there are no rows or no columns
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() || self.movies.is_empty()
    }

    /// Position of a user's row
    pub fn user_position(&self, user_id: UserId) -> Option<usize> {
        self.user_index.get(&user_id).copied()
    }

    /// Row by position
    pub fn row_at(&self, row: usize) -> &[f32] {
        let width = self.movies.len();
        &self.cells[row * width..(row + 1) * width]
    }

    /// A user's full rating row, `None` for an unknown user
    pub fn row(&self, user_id: UserId) -> Option<&[f32]> {
        self.user_position(user_id).map(|row| self.row_at(row))
    }

    /// Cell value, `0.0` for anything unrated or unknown
    pub fn get(&self, user_id: UserId, movie_id: MovieId) -> f32 {
        match (self.user_index.get(&user_id), self.movie_index.get(&movie_id)) {
            (Some(&row), Some(&col)) => self.cells[row * self.movies.len() + col],
            _ => 0.0,
        }
    }

    /// Rated (movie, rating) pairs of one row, skipping unrated cells
    pub fn rated_in_row(&self, row: usize) -> impl Iterator<Item = (MovieId, f32)> + '_ {
        self.row_at(row)
            .iter()
            .zip(&self.movies)
            .filter(|(rating, _)| **rating > 0.0)
            .map(|(&rating, &movie_id)| (movie_id, rating))
    }

    /// Movies the user has rated, empty for an unknown user
    pub fn watched_movies(&self, user_id: UserId) -> HashSet<MovieId> {
        match self.user_position(user_id) {
            Some(row) => self.rated_in_row(row).map(|(movie_id, _)| movie_id).collect(),
            None => HashSet::new(),
        }
    }
}
