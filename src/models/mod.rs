use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Catalog-unique identifier for a movie
pub type MovieId = u32;

/// Identifier for a rating user
pub type UserId = u32;

/// Number of seed titles every recommendation request carries
pub const SEED_COUNT: usize = 3;

/// A movie in the loaded catalog
///
/// Immutable once loaded; all descriptive fields feed the content-based
/// feature vectors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    /// Display title, unique within the catalog for lookup purposes
    pub title: String,
    /// Categorical genre tags
    pub genres: Vec<String>,
    /// Free-text cast listing
    pub cast: Option<String>,
    pub director: Option<String>,
    /// Free-text plot keywords
    pub keywords: Option<String>,
}

/// One user's rating of one movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub score: f32,
    /// When the rating was given; stored upstream as unix seconds
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub rated_at: Option<DateTime<Utc>>,
}

/// A validated recommendation request: exactly three seed titles and a
/// positive result count
#[derive(Debug, Clone)]
pub struct RecommendationRequest {
    pub seed_titles: Vec<String>,
    pub top_n: usize,
}

impl RecommendationRequest {
    /// Validates the raw caller input
    ///
    /// Duplicate seed titles are allowed; they simply reduce effective seed
    /// diversity.
    pub fn new(seed_titles: &[String], top_n: usize) -> AppResult<Self> {
        if seed_titles.len() != SEED_COUNT {
            return Err(AppError::InvalidRequest(format!(
                "expected {} seed titles, got {}",
                SEED_COUNT,
                seed_titles.len()
            )));
        }
        if top_n == 0 {
            return Err(AppError::InvalidRequest(
                "top_n must be positive".to_string(),
            ));
        }
        Ok(Self {
            seed_titles: seed_titles.to_vec(),
            top_n,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeds(titles: &[&str]) -> Vec<String> {
        titles.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_request_accepts_three_seeds() {
        let request =
            RecommendationRequest::new(&seeds(&["Heat", "Ronin", "Thief"]), 10).unwrap();
        assert_eq!(request.seed_titles.len(), 3);
        assert_eq!(request.top_n, 10);
    }

    #[test]
    fn test_request_rejects_wrong_seed_count() {
        let result = RecommendationRequest::new(&seeds(&["Heat", "Ronin"]), 10);
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));

        let result =
            RecommendationRequest::new(&seeds(&["Heat", "Ronin", "Thief", "Leon"]), 10);
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn test_request_rejects_zero_top_n() {
        let result = RecommendationRequest::new(&seeds(&["Heat", "Ronin", "Thief"]), 0);
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn test_request_allows_duplicate_seeds() {
        let request =
            RecommendationRequest::new(&seeds(&["Heat", "Heat", "Heat"]), 5).unwrap();
        assert_eq!(request.seed_titles, seeds(&["Heat", "Heat", "Heat"]));
    }

    #[test]
    fn test_rating_timestamp_deserializes_from_unix_seconds() {
        let rating: Rating = serde_json::from_str(
            r#"{"user_id": 7, "movie_id": 42, "score": 4.5, "rated_at": 1234567890}"#,
        )
        .unwrap();
        assert_eq!(rating.user_id, 7);
        assert_eq!(rating.rated_at.unwrap().timestamp(), 1234567890);

        let rating: Rating =
            serde_json::from_str(r#"{"user_id": 7, "movie_id": 42, "score": 4.5}"#).unwrap();
        assert!(rating.rated_at.is_none());
    }
}
