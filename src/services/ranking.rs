use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::MovieId;

/// Sorts scored candidates by score descending, breaking ties by id
/// ascending so output never depends on hash-map iteration order.
pub(crate) fn sort_by_score(scored: &mut [(MovieId, f64)]) {
    scored.sort_by(|a, b| {
        b.1
            .partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
}

/// Round-robin interleaving of per-seed neighbor lists
///
/// Visits the lists in seed order; on its turn each list contributes its
/// highest-ranked candidate not yet picked and not a seed. Stops once
/// `top_n` items are collected or every list is exhausted, so a sparse
/// catalog under-fills rather than padding. Rank interleaving keeps one
/// seed's similarity scale from dominating the others.
pub(crate) fn interleave(
    per_seed: &[Vec<(MovieId, f64)>],
    seeds: &[MovieId],
    top_n: usize,
) -> Vec<MovieId> {
    let mut picked = Vec::with_capacity(top_n);
    let mut seen: HashSet<MovieId> = seeds.iter().copied().collect();
    let mut cursors = vec![0usize; per_seed.len()];

    loop {
        let mut advanced = false;
        for (list, cursor) in per_seed.iter().zip(cursors.iter_mut()) {
            while *cursor < list.len() && seen.contains(&list[*cursor].0) {
                *cursor += 1;
            }
            if let Some(&(id, _)) = list.get(*cursor) {
                seen.insert(id);
                picked.push(id);
                *cursor += 1;
                advanced = true;
                if picked.len() == top_n {
                    return picked;
                }
            }
        }
        if !advanced {
            return picked;
        }
    }
}
