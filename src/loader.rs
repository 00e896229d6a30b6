use chrono::DateTime;
use serde::Deserialize;

use crate::models::{Movie, MovieId, Rating, UserId};

/// Placeholder the upstream dataset uses for movies without genre tags
const NO_GENRES: &str = "(no genres listed)";

/// Raw movie row as supplied by the caller's storage
///
/// Deserializable so callers can feed rows straight out of a CSV or JSON
/// reader without an intermediate type of their own.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieRecord {
    pub movie_id: MovieId,
    pub title: String,
    /// Pipe-delimited genre list, e.g. `"Action|Drama"`
    #[serde(default)]
    pub genres: String,
    #[serde(default)]
    pub cast: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
}

/// Raw rating row as supplied by the caller's storage
#[derive(Debug, Clone, Deserialize)]
pub struct RatingRecord {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: f32,
    /// Unix seconds
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// The hosting application's movie and rating tables
///
/// The engine never touches storage itself; callers implement this against
/// whatever holds their data and hand it to [`Recommender::from_source`].
///
/// [`Recommender::from_source`]: crate::Recommender::from_source
#[cfg_attr(test, mockall::automock)]
pub trait CatalogSource {
    fn load_movies(&self) -> anyhow::Result<Vec<MovieRecord>>;
    fn load_ratings(&self) -> anyhow::Result<Vec<RatingRecord>>;
}

impl From<MovieRecord> for Movie {
    fn from(record: MovieRecord) -> Self {
        let genres = record
            .genres
            .split('|')
            .map(str::trim)
            .filter(|g| !g.is_empty() && *g != NO_GENRES)
            .map(str::to_string)
            .collect();

        Movie {
            id: record.movie_id,
            title: record.title,
            genres,
            cast: record.cast,
            director: record.director,
            keywords: record.keywords,
        }
    }
}

impl From<RatingRecord> for Rating {
    fn from(record: RatingRecord) -> Self {
        Rating {
            user_id: record.user_id,
            movie_id: record.movie_id,
            score: record.rating,
            rated_at: record
                .timestamp
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        }
    }
}
