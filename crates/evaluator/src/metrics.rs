//! Offline quality metrics for a batch of recommendations.
//!
//! All functions are pure. Degenerate input (no entries, no users, a zero
//! denominator) yields `0.0` rather than NaN.

use crate::harness::RecommendationMap;
use crate::split::HeldOutEntry;
use data_loader::MovieId;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Fraction of held-out entries whose movie shows up in that user's list
///
/// A user missing from the map counts as a miss. Entries with unreadable ids
/// are left out of both the hits and the total.
pub fn hit_rate<E: HeldOutEntry>(recommendations: &RecommendationMap, held_out: &[E]) -> f64 {
    let mut hits = 0usize;
    let mut total = 0usize;

    for (user_id, movie_id) in held_out.iter().filter_map(|entry| entry.ids()) {
        let hit = recommendations
            .get(&user_id)
            .is_some_and(|list| list.contains(&movie_id));
        if hit {
            hits += 1;
        }
        total += 1;
    }

    ratio(hits as f64, total)
}

/// Mean of `1 / rank` over held-out entries, 0 for a miss
///
/// Rank starts at 1 for the head of the list. Uses the same denominator as
/// [`hit_rate`].
pub fn average_reciprocal_hit_rate<E: HeldOutEntry>(
    recommendations: &RecommendationMap,
    held_out: &[E],
) -> f64 {
    let mut reciprocal_sum = 0.0f64;
    let mut total = 0usize;

    for (user_id, movie_id) in held_out.iter().filter_map(|entry| entry.ids()) {
        let position = recommendations
            .get(&user_id)
            .and_then(|list| list.iter().position(|&m| m == movie_id));
        if let Some(position) = position {
            reciprocal_sum += 1.0 / (position + 1) as f64;
        }
        total += 1;
    }

    ratio(reciprocal_sum, total)
}

/// Share of the catalog that was recommended to at least one user
pub fn coverage(recommendations: &RecommendationMap, catalog_size: usize) -> f64 {
    let recommended: HashSet<MovieId> = recommendations.values().flatten().copied().collect();
    ratio(recommended.len() as f64, catalog_size)
}

/// Genre tags per movie, split once from the pipe-delimited strings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreMap {
    genres: HashMap<MovieId, Vec<String>>,
}

impl GenreMap {
    /// Split every `"Action|Comedy"` string on `|`, dropping empty tags
    pub fn from_delimited(raw: HashMap<MovieId, String>) -> Self {
        let genres = raw
            .into_iter()
            .map(|(movie_id, tags)| {
                let tags = tags
                    .split('|')
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect();
                (movie_id, tags)
            })
            .collect();
        Self { genres }
    }

    pub fn genres(&self, movie_id: MovieId) -> &[String] {
        self.genres.get(&movie_id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }
}

/// Gini-Simpson index over the genre tags of one recommendation list
///
/// `1 - sum(p^2)` where `p` is each genre's share of all tag occurrences in
/// the list. Movies without genres add nothing; no genres at all gives 0.0.
pub fn gini_simpson_diversity(list: &[MovieId], genres: &GenreMap) -> f64 {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut total = 0usize;

    for &movie_id in list {
        for genre in genres.genres(movie_id) {
            *counts.entry(genre.as_str()).or_insert(0) += 1;
            total += 1;
        }
    }

    if total == 0 {
        return 0.0;
    }
    let concentration: f64 = counts
        .values()
        .map(|&count| {
            let p = count as f64 / total as f64;
            p * p
        })
        .sum();
    1.0 - concentration
}

/// Mean per-user Gini-Simpson diversity
///
/// 0.0 when the genre map is missing or empty or there are no users.
pub fn average_gini_simpson_diversity(
    recommendations: &RecommendationMap,
    genres: Option<&GenreMap>,
) -> f64 {
    let Some(genres) = genres.filter(|g| !g.is_empty()) else {
        return 0.0;
    };
    let total: f64 = recommendations
        .values()
        .map(|list| gini_simpson_diversity(list, genres))
        .sum();
    ratio(total, recommendations.len())
}

/// How many users each movie was recommended to
pub fn movie_popularity(recommendations: &RecommendationMap) -> HashMap<MovieId, usize> {
    let mut popularity = HashMap::new();
    for &movie_id in recommendations.values().flatten() {
        *popularity.entry(movie_id).or_insert(0) += 1;
    }
    popularity
}

/// Mean of `log2(total_users / popularity)` over one list
///
/// Movies with no popularity entry are skipped; an empty list gives 0.0.
pub fn average_novelty_for_list(
    list: &[MovieId],
    total_users: usize,
    popularity: &HashMap<MovieId, usize>,
) -> f64 {
    let mut total_novelty = 0.0f64;
    let mut counted = 0usize;

    for movie_id in list {
        match popularity.get(movie_id) {
            Some(&count) if count > 0 => {
                total_novelty += (total_users as f64 / count as f64).log2();
                counted += 1;
            }
            _ => {}
        }
    }

    ratio(total_novelty, counted)
}

/// Mean per-user novelty, popularity taken from the map itself
pub fn average_novelty(recommendations: &RecommendationMap) -> f64 {
    let total_users = recommendations.len();
    let popularity = movie_popularity(recommendations);
    let total: f64 = recommendations
        .values()
        .map(|list| average_novelty_for_list(list, total_users, &popularity))
        .sum();
    ratio(total, total_users)
}

fn ratio(numerator: f64, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}
