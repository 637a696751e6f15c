//! User-to-user cosine similarity.
//!
//! Unrated cells count as zero-magnitude dimensions rather than missing data,
//! which is the usual approximation of memory-based collaborative filtering.

use crate::matrix::RatingMatrix;
use data_loader::UserId;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// A similar user and how similar they are
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub user_id: UserId,
    pub score: f64,
}

impl Neighbor {
    pub fn new(user_id: UserId, score: f64) -> Self {
        Self { user_id, score }
    }
}

/// Square, symmetric user-by-user similarity matrix
///
/// Indexed by the same user labels as the rating matrix it came from.
/// The diagonal is exactly 1.0 and every value lies in [-1, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    users: Vec<UserId>,
    user_index: HashMap<UserId, usize>,
    values: Vec<f64>,
}

/// Compute pairwise cosine similarity between every pair of user rows
///
/// Returns `None` for a matrix with no rows or no columns. A pair involving a
/// user with no ratings at all scores 0.0.
pub fn build_similarity_matrix(matrix: &RatingMatrix) -> Option<SimilarityMatrix> {
    if matrix.is_empty() {
        return None;
    }

    let n = matrix.n_users();
    let width = matrix.n_movies();

    // Sparse view of each row: (column, rating) for rated cells only
    let rows: Vec<Vec<(usize, f64)>> = (0..n)
        .map(|row| {
            matrix
                .row_at(row)
                .iter()
                .enumerate()
                .filter(|(_, r)| **r != 0.0)
                .map(|(col, &r)| (col, r as f64))
                .collect()
        })
        .collect();
    let norms: Vec<f64> = rows
        .iter()
        .map(|row| row.iter().map(|(_, r)| r * r).sum::<f64>().sqrt())
        .collect();

    // Upper triangle, one row per task; collected in row order
    let upper: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|a| {
            let mut dense = vec![0.0f64; width];
            for &(col, r) in &rows[a] {
                dense[col] = r;
            }
            ((a + 1)..n)
                .map(|b| {
                    let dot: f64 = rows[b].iter().map(|&(col, r)| dense[col] * r).sum();
                    cosine(dot, norms[a], norms[b])
                })
                .collect()
        })
        .collect();

    let mut values = vec![0.0f64; n * n];
    for (a, row) in upper.iter().enumerate() {
        values[a * n + a] = 1.0;
        for (offset, &sim) in row.iter().enumerate() {
            let b = a + 1 + offset;
            values[a * n + b] = sim;
            values[b * n + a] = sim;
        }
    }

    debug!("Built {}x{} similarity matrix", n, n);
    SimilarityMatrix::from_parts(matrix.users().to_vec(), values)
}

fn cosine(dot: f64, norm_a: f64, norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Order by score descending, then user id ascending
fn by_score_then_id(a: &Neighbor, b: &Neighbor) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.user_id.cmp(&b.user_id))
}

impl SimilarityMatrix {
    fn from_parts(users: Vec<UserId>, values: Vec<f64>) -> Option<Self> {
        if users.is_empty() || values.len() != users.len() * users.len() {
            return None;
        }
        let user_index: HashMap<UserId, usize> =
            users.iter().enumerate().map(|(i, &u)| (u, i)).collect();
        if user_index.len() != users.len() {
            return None;
        }
        Some(Self {
            users,
            user_index,
            values,
        })
    }

    /// Build from explicit labels and row-major values
    ///
    /// Values are taken as given; no symmetry check is made.
    pub fn from_dense(users: Vec<UserId>, values: Vec<f64>) -> Option<Self> {
        Self::from_parts(users, values)
    }

    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Similarity between two users, `None` if either is unknown
    pub fn get(&self, a: UserId, b: UserId) -> Option<f64> {
        let row = *self.user_index.get(&a)?;
        let col = *self.user_index.get(&b)?;
        Some(self.values[row * self.users.len() + col])
    }

    /// The `k` users most similar to `user_id`, most similar first
    ///
    /// The queried user is never included. Equal scores are ordered by
    /// ascending user id. An unknown user yields an empty list.
    pub fn top_similar_users(&self, user_id: UserId, k: usize) -> Vec<Neighbor> {
        let Some(&row) = self.user_index.get(&user_id) else {
            return Vec::new();
        };
        let n = self.users.len();

        let mut neighbors: Vec<Neighbor> = self.values[row * n..(row + 1) * n]
            .iter()
            .zip(&self.users)
            .filter(|(_, other)| **other != user_id)
            .map(|(&score, &other)| Neighbor::new(other, score))
            .collect();

        neighbors.sort_by(by_score_then_id);
        neighbors.truncate(k);
        neighbors
    }
}
