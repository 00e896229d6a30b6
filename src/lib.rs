//! Movie recommendation engine
//!
//! Two alternative predictors over an immutable catalog snapshot: content
//! based (bag-of-tokens cosine similarity over item metadata) and
//! collaborative (adjusted-cosine similarity over rating co-occurrence).
//! Both map three seed titles to a ranked top-N list of suggested titles.
//!
//! Construction is separated from querying: build a [`Recommender`] once
//! per catalog load, then call [`Recommender::content_model`] or
//! [`Recommender::collab_model`] from any number of threads. Presentation
//! concerns (serving, rendering, timeouts) belong to the caller.

pub mod catalog;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod services;

use tracing::debug;

pub use catalog::Catalog;
pub use config::EngineConfig;
pub use error::{AppError, AppResult};
pub use loader::{CatalogSource, MovieRecord, RatingRecord};
pub use services::collab::RatingMatrix;
pub use services::content::ContentIndex;

use models::{MovieId, Rating, RecommendationRequest};
use services::ranking;

/// Immutable recommendation engine
///
/// Owns the catalog snapshot, the content index, and the rating matrix.
/// All query paths take `&self` and allocate only request-local state, so
/// concurrent requests need no locking; rebuilding means constructing a
/// fresh value and swapping it at the caller's boundary.
pub struct Recommender {
    catalog: Catalog,
    content: ContentIndex,
    ratings: RatingMatrix,
    config: EngineConfig,
}

impl Recommender {
    /// Builds the engine from raw movie and rating rows
    pub fn new(
        movies: Vec<MovieRecord>,
        ratings: Vec<RatingRecord>,
        config: EngineConfig,
    ) -> AppResult<Self> {
        let catalog = Catalog::from_records(movies)?;
        let content = ContentIndex::build(&catalog);
        let ratings: Vec<Rating> = ratings.into_iter().map(Rating::from).collect();
        let matrix = RatingMatrix::build(&ratings)?;
        Ok(Self {
            catalog,
            content,
            ratings: matrix,
            config,
        })
    }

    /// Builds the engine from the caller's storage collaborator
    pub fn from_source(source: &dyn CatalogSource, config: EngineConfig) -> AppResult<Self> {
        let movies = source.load_movies()?;
        let ratings = source.load_ratings()?;
        Self::new(movies, ratings, config)
    }

    /// Content-based recommendations: items whose metadata tokens are
    /// closest to the seeds', rank-interleaved across the three seeds
    pub fn content_model(&self, movie_list: &[String], top_n: usize) -> AppResult<Vec<String>> {
        let request = RecommendationRequest::new(movie_list, top_n)?;
        let seeds = self.resolve_seeds(&request)?;
        let k = self.neighbors_per_seed(top_n);

        debug!(?seeds, top_n, "content model query");
        let per_seed: Vec<Vec<(MovieId, f64)>> = seeds
            .iter()
            .map(|&seed| self.content.neighbors(&self.catalog, seed, k))
            .collect();
        self.finish(&seeds, &per_seed, top_n)
    }

    /// Collaborative recommendations: items co-rated with the seeds by the
    /// same users, rank-interleaved across the three seeds
    pub fn collab_model(&self, movie_list: &[String], top_n: usize) -> AppResult<Vec<String>> {
        let request = RecommendationRequest::new(movie_list, top_n)?;
        let seeds = self.resolve_seeds(&request)?;
        let k = self.neighbors_per_seed(top_n);

        debug!(?seeds, top_n, "collaborative model query");
        let per_seed: Vec<Vec<(MovieId, f64)>> = seeds
            .iter()
            .map(|&seed| {
                self.ratings
                    .neighbors(&self.catalog, seed, self.config.min_co_raters, k)
            })
            .collect();
        self.finish(&seeds, &per_seed, top_n)
    }

    /// Case-insensitive title search, in catalog order
    pub fn search(&self, query: &str) -> Vec<String> {
        self.catalog
            .search(query)
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Highest mean-rated titles with at least `min_ratings` ratings
    ///
    /// Ratings for movies the catalog never loaded are dropped before the
    /// chart is cut to `n`, so they cannot shorten it.
    pub fn top_rated(&self, n: usize, min_ratings: usize) -> Vec<(String, f64)> {
        self.ratings
            .top_rated(self.ratings.item_count(), min_ratings)
            .into_iter()
            .filter_map(|(id, mean)| {
                self.catalog.title_of(id).map(|title| (title.to_owned(), mean))
            })
            .take(n)
            .collect()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn resolve_seeds(&self, request: &RecommendationRequest) -> AppResult<Vec<MovieId>> {
        request
            .seed_titles
            .iter()
            .map(|title| self.catalog.resolve_title(title).map(|movie| movie.id))
            .collect()
    }

    /// Per-seed neighbor list length. Raised above the configured value for
    /// large requests: a list must hold top_n candidates even after the
    /// other seeds are skipped out of it.
    fn neighbors_per_seed(&self, top_n: usize) -> usize {
        self.config.neighbors_per_seed.max(top_n + models::SEED_COUNT)
    }

    /// Interleaves the per-seed rankings and maps picks back to titles.
    /// A request that produces no candidates at all is a data problem, not
    /// an empty result.
    fn finish(
        &self,
        seeds: &[MovieId],
        per_seed: &[Vec<(MovieId, f64)>],
        top_n: usize,
    ) -> AppResult<Vec<String>> {
        let picked = ranking::interleave(per_seed, seeds, top_n);
        if picked.is_empty() {
            return Err(AppError::InsufficientData(
                "no candidates found for the given seeds".to_string(),
            ));
        }
        Ok(picked
            .into_iter()
            .filter_map(|id| self.catalog.title_of(id).map(str::to_owned))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MockCatalogSource;

    fn movie(id: MovieId, title: &str, genres: &str) -> MovieRecord {
        MovieRecord {
            movie_id: id,
            title: title.to_string(),
            genres: genres.to_string(),
            cast: None,
            director: None,
            keywords: None,
        }
    }

    fn rating(user_id: u32, movie_id: MovieId, score: f32) -> RatingRecord {
        RatingRecord {
            user_id,
            movie_id,
            rating: score,
            timestamp: None,
        }
    }

    #[test]
    fn test_from_source_builds_engine() {
        let mut source = MockCatalogSource::new();
        source.expect_load_movies().returning(|| {
            Ok(vec![
                movie(1, "Heat (1995)", "Action|Crime"),
                movie(2, "Ronin (1998)", "Action|Thriller"),
            ])
        });
        source
            .expect_load_ratings()
            .returning(|| Ok(vec![rating(1, 1, 4.0), rating(1, 2, 4.5)]));

        let recommender =
            Recommender::from_source(&source, EngineConfig::default()).unwrap();
        assert_eq!(recommender.catalog().len(), 2);
    }

    #[test]
    fn test_from_source_propagates_loader_errors() {
        let mut source = MockCatalogSource::new();
        source
            .expect_load_movies()
            .returning(|| Err(anyhow::anyhow!("movies table unreachable")));

        let result = Recommender::from_source(&source, EngineConfig::default());
        assert!(matches!(result, Err(AppError::Source(_))));
    }

    #[test]
    fn test_from_source_rejects_empty_tables() {
        let mut source = MockCatalogSource::new();
        source.expect_load_movies().returning(|| Ok(vec![]));
        source.expect_load_ratings().returning(|| Ok(vec![]));

        let result = Recommender::from_source(&source, EngineConfig::default());
        assert!(matches!(result, Err(AppError::InsufficientData(_))));
    }
}
