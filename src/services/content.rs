use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::models::{Movie, MovieId};
use crate::services::ranking::sort_by_score;

/// Sparse token-count vector with a precomputed L2 norm
#[derive(Debug, Clone)]
struct FeatureVector {
    /// (vocabulary index, count) pairs, sorted by index
    terms: Vec<(usize, f32)>,
    norm: f32,
}

impl FeatureVector {
    fn from_counts(counts: HashMap<usize, f32>) -> Self {
        let mut terms: Vec<(usize, f32)> = counts.into_iter().collect();
        terms.sort_unstable_by_key(|&(index, _)| index);
        let norm = terms.iter().map(|&(_, count)| count * count).sum::<f32>().sqrt();
        Self { terms, norm }
    }

    /// Cosine similarity: dot product over the product of L2 norms.
    /// Zero when either vector is empty.
    fn cosine(&self, other: &Self) -> f64 {
        if self.norm == 0.0 || other.norm == 0.0 {
            return 0.0;
        }

        // Merge join over the sorted term lists
        let mut dot = 0.0f64;
        let (mut i, mut j) = (0, 0);
        while i < self.terms.len() && j < other.terms.len() {
            match self.terms[i].0.cmp(&other.terms[j].0) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    dot += f64::from(self.terms[i].1) * f64::from(other.terms[j].1);
                    i += 1;
                    j += 1;
                }
            }
        }
        dot / (f64::from(self.norm) * f64::from(other.norm))
    }
}

/// Bag-of-tokens index over the whole catalog
///
/// The vocabulary is fit once over every item at build time, not per
/// request; vectors are stored parallel to [`Catalog::movies`] and never
/// mutated afterwards, so concurrent queries share the index freely.
#[derive(Debug)]
pub struct ContentIndex {
    vocabulary: HashMap<String, usize>,
    /// Parallel to the catalog's sorted movie slice
    vectors: Vec<FeatureVector>,
}

impl ContentIndex {
    pub fn build(catalog: &Catalog) -> Self {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut vectors = Vec::with_capacity(catalog.len());

        for movie in catalog.movies() {
            let mut counts: HashMap<usize, f32> = HashMap::new();
            for token in tokenize(movie) {
                let next = vocabulary.len();
                let index = *vocabulary.entry(token).or_insert(next);
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
            vectors.push(FeatureVector::from_counts(counts));
        }

        info!(
            movies = vectors.len(),
            vocabulary = vocabulary.len(),
            "content index built"
        );
        Self {
            vocabulary,
            vectors,
        }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Top-k neighbors of `seed` across the whole catalog, ranked by
    /// (similarity desc, id asc)
    ///
    /// Zero-similarity candidates are kept at the tail of the ranking so a
    /// sparse catalog can still fill a request; they only surface when
    /// nothing better remains.
    pub(crate) fn neighbors(
        &self,
        catalog: &Catalog,
        seed: MovieId,
        k: usize,
    ) -> Vec<(MovieId, f64)> {
        let Some(position) = catalog.position(seed) else {
            return Vec::new();
        };
        let seed_vector = &self.vectors[position];

        let mut scored: Vec<(MovieId, f64)> = catalog
            .movies()
            .iter()
            .enumerate()
            .filter(|&(index, _)| index != position)
            .map(|(index, movie)| (movie.id, seed_vector.cosine(&self.vectors[index])))
            .collect();
        sort_by_score(&mut scored);
        scored.truncate(k);

        debug!(seed, neighbors = scored.len(), "content neighbors scored");
        scored
    }
}

/// Flattens a movie's categorical tags and textual metadata into one token
/// multiset: lowercase alphanumeric runs, everything else a separator.
fn tokenize(movie: &Movie) -> Vec<String> {
    let mut tokens = Vec::new();
    for genre in &movie.genres {
        push_tokens(&mut tokens, genre);
    }
    for field in [&movie.cast, &movie.director, &movie.keywords] {
        if let Some(text) = field {
            push_tokens(&mut tokens, text);
        }
    }
    tokens
}

fn push_tokens(tokens: &mut Vec<String>, text: &str) {
    tokens.extend(
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase),
    );
}
