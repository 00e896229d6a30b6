use std::collections::HashMap;

use tracing::info;

use crate::error::{AppError, AppResult};
use crate::loader::MovieRecord;
use crate::models::{Movie, MovieId};

/// Immutable snapshot of the movie catalog
///
/// Built once per load and shared read-only across requests. Movies are
/// held sorted by id so every scan over the catalog is deterministic, and
/// a normalized title index answers seed lookups in O(1).
#[derive(Debug)]
pub struct Catalog {
    /// Sorted by id ascending
    movies: Vec<Movie>,
    positions: HashMap<MovieId, usize>,
    /// Normalized title -> id; on duplicate titles the lowest id wins
    titles: HashMap<String, MovieId>,
}

/// Lookup normalization: lookups tolerate case and surrounding-whitespace
/// variance, nothing fuzzier.
fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

impl Catalog {
    pub fn from_records(records: Vec<MovieRecord>) -> AppResult<Self> {
        if records.is_empty() {
            return Err(AppError::InsufficientData(
                "movie catalog is empty".to_string(),
            ));
        }

        let mut movies: Vec<Movie> = records.into_iter().map(Movie::from).collect();
        movies.sort_by_key(|m| m.id);
        movies.dedup_by_key(|m| m.id);

        let mut positions = HashMap::with_capacity(movies.len());
        let mut titles = HashMap::with_capacity(movies.len());
        for (position, movie) in movies.iter().enumerate() {
            positions.insert(movie.id, position);
            titles
                .entry(normalize_title(&movie.title))
                .or_insert(movie.id);
        }

        info!(movies = movies.len(), "catalog loaded");
        Ok(Self {
            movies,
            positions,
            titles,
        })
    }

    /// Resolves a seed title to its catalog entry
    ///
    /// A missing seed corrupts the aggregate ranking, so this fails loudly
    /// instead of skipping the title.
    pub fn resolve_title(&self, title: &str) -> AppResult<&Movie> {
        self.titles
            .get(&normalize_title(title))
            .and_then(|id| self.movie(*id))
            .ok_or_else(|| {
                AppError::NotFound(format!("no catalog entry for title '{}'", title.trim()))
            })
    }

    pub fn movie(&self, id: MovieId) -> Option<&Movie> {
        self.positions.get(&id).map(|&position| &self.movies[position])
    }

    pub fn title_of(&self, id: MovieId) -> Option<&str> {
        self.movie(id).map(|m| m.title.as_str())
    }

    /// Position of a movie in the sorted `movies()` slice
    pub(crate) fn position(&self, id: MovieId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// All movies, sorted by id ascending
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Case-insensitive substring search over titles, in id order
    pub fn search(&self, query: &str) -> Vec<&str> {
        let needle = normalize_title(query);
        if needle.is_empty() {
            return Vec::new();
        }
        self.movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .map(|m| m.title.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: MovieId, title: &str) -> MovieRecord {
        MovieRecord {
            movie_id: id,
            title: title.to_string(),
            genres: String::new(),
            cast: None,
            director: None,
            keywords: None,
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_records(vec![
            record(3, "Ronin (1998)"),
            record(1, "Heat (1995)"),
            record(2, "Thief (1981)"),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_catalog_is_insufficient_data() {
        let result = Catalog::from_records(vec![]);
        assert!(matches!(result, Err(AppError::InsufficientData(_))));
    }

    #[test]
    fn test_movies_sorted_by_id() {
        let catalog = catalog();
        let ids: Vec<MovieId> = catalog.movies().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_resolve_title_tolerates_case_and_whitespace() {
        let catalog = catalog();
        assert_eq!(catalog.resolve_title("Heat (1995)").unwrap().id, 1);
        assert_eq!(catalog.resolve_title("  heat (1995)  ").unwrap().id, 1);
        assert_eq!(catalog.resolve_title("HEAT (1995)").unwrap().id, 1);
    }

    #[test]
    fn test_resolve_unknown_title_is_not_found() {
        let catalog = catalog();
        let result = catalog.resolve_title("Solaris (1972)");
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_duplicate_titles_resolve_to_lowest_id() {
        let catalog = Catalog::from_records(vec![
            record(10, "Gloria (1980)"),
            record(4, "Gloria (1980)"),
        ])
        .unwrap();
        assert_eq!(catalog.resolve_title("Gloria (1980)").unwrap().id, 4);
    }

    #[test]
    fn test_search_matches_substrings() {
        let catalog = catalog();
        assert_eq!(catalog.search("hea"), vec!["Heat (1995)"]);
        assert_eq!(catalog.search("19"), vec!["Heat (1995)", "Thief (1981)", "Ronin (1998)"]);
        assert!(catalog.search("solaris").is_empty());
        assert!(catalog.search("   ").is_empty());
    }
}
