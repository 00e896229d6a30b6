use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::{AppError, AppResult};
use crate::models::{MovieId, Rating, UserId};
use crate::services::ranking::sort_by_score;

/// Sparse user×item rating matrix
///
/// Missing entries mean "no opinion", never zero. Per-user mean ratings are
/// precomputed once so query-time similarity can center scores without
/// rescanning rows. Immutable after build.
#[derive(Debug)]
pub struct RatingMatrix {
    by_user: HashMap<UserId, HashMap<MovieId, f32>>,
    by_item: HashMap<MovieId, HashMap<UserId, f32>>,
    user_means: HashMap<UserId, f64>,
}

impl RatingMatrix {
    pub fn build(ratings: &[Rating]) -> AppResult<Self> {
        if ratings.is_empty() {
            return Err(AppError::InsufficientData(
                "rating table is empty".to_string(),
            ));
        }

        // Last row wins on duplicate (user, movie) pairs
        let mut by_user: HashMap<UserId, HashMap<MovieId, f32>> = HashMap::new();
        for rating in ratings {
            by_user
                .entry(rating.user_id)
                .or_default()
                .insert(rating.movie_id, rating.score);
        }

        let mut by_item: HashMap<MovieId, HashMap<UserId, f32>> = HashMap::new();
        let mut user_means = HashMap::with_capacity(by_user.len());
        for (&user, scores) in &by_user {
            let mean =
                scores.values().map(|&s| f64::from(s)).sum::<f64>() / scores.len() as f64;
            user_means.insert(user, mean);
            for (&movie, &score) in scores {
                by_item.entry(movie).or_default().insert(user, score);
            }
        }

        info!(
            users = by_user.len(),
            items = by_item.len(),
            "rating matrix built"
        );
        Ok(Self {
            by_user,
            by_item,
            user_means,
        })
    }

    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    pub fn item_count(&self) -> usize {
        self.by_item.len()
    }

    /// Ranked neighbors of `seed` within its co-rater neighborhood
    ///
    /// Candidates are the other catalog items rated by the seed's raters;
    /// scored by adjusted cosine (each rating centered on its user's
    /// overall mean) over the shared-user set. Candidates with fewer than
    /// `min_co_raters` shared users are skipped entirely. Rating rows can
    /// reference movies the catalog never loaded (the tables arrive from
    /// separate files), so membership is checked here, before ranking and
    /// truncation, and downstream interleaving only ever sees resolvable
    /// ids. Restricting the scan to the neighborhood keeps a request far
    /// below a full items² pass.
    pub(crate) fn neighbors(
        &self,
        catalog: &Catalog,
        seed: MovieId,
        min_co_raters: usize,
        k: usize,
    ) -> Vec<(MovieId, f64)> {
        let Some(seed_raters) = self.by_item.get(&seed) else {
            return Vec::new();
        };

        let mut candidates: HashSet<MovieId> = HashSet::new();
        for user in seed_raters.keys() {
            if let Some(rated) = self.by_user.get(user) {
                candidates.extend(rated.keys().copied());
            }
        }
        candidates.remove(&seed);

        let mut scored = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if catalog.movie(candidate).is_none() {
                continue;
            }
            let Some(candidate_raters) = self.by_item.get(&candidate) else {
                continue;
            };
            if let Some(score) =
                self.adjusted_cosine(seed_raters, candidate_raters, min_co_raters)
            {
                scored.push((candidate, score));
            }
        }
        sort_by_score(&mut scored);
        scored.truncate(k);

        debug!(seed, neighbors = scored.len(), "collaborative neighbors scored");
        scored
    }

    /// Adjusted cosine over the users present in both rating rows; `None`
    /// when fewer than `min_co_raters` users rated both items.
    fn adjusted_cosine(
        &self,
        seed_raters: &HashMap<UserId, f32>,
        candidate_raters: &HashMap<UserId, f32>,
        min_co_raters: usize,
    ) -> Option<f64> {
        let mut shared = 0usize;
        let mut dot = 0.0f64;
        let mut seed_norm = 0.0f64;
        let mut candidate_norm = 0.0f64;

        for (user, &seed_score) in seed_raters {
            let Some(&candidate_score) = candidate_raters.get(user) else {
                continue;
            };
            let mean = self.user_means.get(user).copied().unwrap_or(0.0);
            let a = f64::from(seed_score) - mean;
            let b = f64::from(candidate_score) - mean;
            dot += a * b;
            seed_norm += a * a;
            candidate_norm += b * b;
            shared += 1;
        }

        if shared < min_co_raters {
            return None;
        }
        let denominator = seed_norm.sqrt() * candidate_norm.sqrt();
        if denominator == 0.0 {
            // No variance among the shared raters; co-rated but uninformative
            Some(0.0)
        } else {
            Some(dot / denominator)
        }
    }

    /// Mean-rating chart over the whole matrix: (movie id, mean rating)
    /// ranked descending, ties broken by id ascending. Items with fewer
    /// than `min_ratings` ratings are ignored.
    pub fn top_rated(&self, n: usize, min_ratings: usize) -> Vec<(MovieId, f64)> {
        let mut means: Vec<(MovieId, f64)> = self
            .by_item
            .iter()
            .filter(|(_, raters)| raters.len() >= min_ratings)
            .map(|(&movie, raters)| {
                let mean = raters.values().map(|&s| f64::from(s)).sum::<f64>()
                    / raters.len() as f64;
                (movie, mean)
            })
            .collect();
        sort_by_score(&mut means);
        means.truncate(n);
        means
    }
}
