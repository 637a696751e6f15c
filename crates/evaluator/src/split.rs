//! Leave-one-out test set construction.
//!
//! One rating per user is held out as ground truth for the hit-rate metrics.
//! The choice is random but driven by a fixed seed, so a given ratings list
//! and seed always produce the same split.

use data_loader::{MovieId, Rating, UserId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::collections::HashMap;

/// Anything that can stand in for a held-out (user, movie, rating) entry
///
/// Entries whose ids cannot be read are skipped by the metrics entirely.
pub trait HeldOutEntry {
    /// The (user, movie) pair, or `None` if either id is unusable
    fn ids(&self) -> Option<(UserId, MovieId)>;
}

/// A held-out rating produced by the split
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeldOutRating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: f32,
}

impl From<Rating> for HeldOutRating {
    fn from(rating: Rating) -> Self {
        Self {
            user_id: rating.user_id,
            movie_id: rating.movie_id,
            rating: rating.rating,
        }
    }
}

impl HeldOutEntry for HeldOutRating {
    fn ids(&self) -> Option<(UserId, MovieId)> {
        Some((self.user_id, self.movie_id))
    }
}

/// A held-out entry read from an external file, ids not yet validated
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawHeldOut {
    #[serde(alias = "userId")]
    pub user_id: String,
    #[serde(alias = "movieId")]
    pub movie_id: String,
    #[serde(default)]
    pub rating: String,
}

impl RawHeldOut {
    pub fn new(user_id: impl Into<String>, movie_id: impl Into<String>, rating: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            movie_id: movie_id.into(),
            rating: rating.into(),
        }
    }
}

impl HeldOutEntry for RawHeldOut {
    fn ids(&self) -> Option<(UserId, MovieId)> {
        let user_id = self.user_id.trim().parse().ok()?;
        let movie_id = self.movie_id.trim().parse().ok()?;
        Some((user_id, movie_id))
    }
}

/// Both sides of a leave-one-out split
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveOneOutSplit {
    /// Every rating not held out, in input order
    pub train: Vec<Rating>,
    /// Exactly one rating per user, users in order of first appearance
    pub test: Vec<HeldOutRating>,
}

/// Hold out one randomly chosen rating per user
///
/// Users are visited in the order they first appear in `ratings`; for each,
/// a single `StdRng` seeded with `seed` picks an index into that user's
/// ratings. A user with one rating loses it to the test side.
pub fn leave_one_out_split(ratings: &[Rating], seed: u64) -> LeaveOneOutSplit {
    let mut positions: HashMap<UserId, usize> = HashMap::new();
    let mut per_user: Vec<Vec<usize>> = Vec::new();
    for (idx, rating) in ratings.iter().enumerate() {
        let slot = *positions.entry(rating.user_id).or_insert_with(|| {
            per_user.push(Vec::new());
            per_user.len() - 1
        });
        per_user[slot].push(idx);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut held_out = vec![false; ratings.len()];
    let mut test = Vec::with_capacity(per_user.len());
    for indices in &per_user {
        let pick = indices[rng.random_range(0..indices.len())];
        held_out[pick] = true;
        test.push(HeldOutRating::from(ratings[pick]));
    }

    let train = ratings
        .iter()
        .zip(&held_out)
        .filter(|(_, held)| !**held)
        .map(|(rating, _)| *rating)
        .collect();

    LeaveOneOutSplit { train, test }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn mock_ratings() -> Vec<Rating> {
        vec![
            Rating::new(1, 101, 5.0),
            Rating::new(2, 101, 5.0),
            Rating::new(2, 102, 4.0),
            Rating::new(3, 101, 2.0),
            Rating::new(3, 103, 4.0),
        ]
    }

    #[test]
    fn test_one_held_out_rating_per_user() {
        let ratings = mock_ratings();
        let split = leave_one_out_split(&ratings, 1);

        let users: Vec<UserId> = split.test.iter().map(|h| h.user_id).collect();
        assert_eq!(users, vec![1, 2, 3]);
        assert_eq!(split.train.len() + split.test.len(), ratings.len());

        for held in &split.test {
            assert!(ratings.iter().any(|r| HeldOutRating::from(*r) == *held));
            assert!(!split.train.iter().any(|r| r.user_id == held.user_id && r.movie_id == held.movie_id));
        }
    }

    #[test]
    fn test_single_rating_user_is_held_out() {
        let split = leave_one_out_split(&mock_ratings(), 1);
        assert_eq!(split.test[0], HeldOutRating { user_id: 1, movie_id: 101, rating: 5.0 });
        assert!(split.train.iter().all(|r| r.user_id != 1));
    }

    #[test]
    fn test_split_is_reproducible_under_seed() {
        let ratings: Vec<Rating> = (1..=20)
            .flat_map(|u| (1..=15).map(move |m| Rating::new(u, m, 3.0)))
            .collect();

        let first = leave_one_out_split(&ratings, 1);
        let second = leave_one_out_split(&ratings, 1);
        assert_eq!(first, second);

        let picked: HashSet<MovieId> = first.test.iter().map(|h| h.movie_id).collect();
        assert!(picked.len() > 1, "picks should vary across users");
    }

    #[test]
    fn test_empty_ratings() {
        let split = leave_one_out_split(&[], 1);
        assert!(split.train.is_empty());
        assert!(split.test.is_empty());
    }

    #[test]
    fn test_raw_entry_ids() {
        assert_eq!(RawHeldOut::new("3", " 105 ", "4.0").ids(), Some((3, 105)));
        assert_eq!(RawHeldOut::new("invalid user", "101", "2.0").ids(), None);
        assert_eq!(RawHeldOut::new("2", "invalid movie", "5.0").ids(), None);
    }
}
