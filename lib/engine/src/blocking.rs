//! Blocking
//!
//! Groups records by predicate block keys so candidate pairs only come from
//! records that share at least one key, and learns which predicates to use
//! from labeled examples.

use ahash::AHashMap;
use dedupx_core::{Dataset, RecordId, TrainingData};
use dedupx_similarity::{candidate_predicates, default_predicates, FieldSchema, Predicate};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Inverted index from (predicate, block key) to the records in that block
#[derive(Debug, Default)]
pub struct BlockIndex {
    blocks: AHashMap<(usize, String), Vec<RecordId>>,
}

impl BlockIndex {
    /// Index every record of the dataset under every predicate
    pub fn build(dataset: &Dataset, predicates: &[Predicate]) -> Self {
        let mut blocks: AHashMap<(usize, String), Vec<RecordId>> = AHashMap::new();

        for (id, record) in dataset.iter() {
            for (p_idx, predicate) in predicates.iter().enumerate() {
                if let Some(key) = predicate.key(record) {
                    blocks.entry((p_idx, key)).or_default().push(id);
                }
            }
        }

        Self { blocks }
    }

    /// Number of non-empty blocks across all predicates
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Distinct unordered pairs sharing a block, sorted ascending.
    ///
    /// Blocks larger than `max_block_size` are skipped when a limit is given.
    pub fn candidate_pairs(&self, max_block_size: Option<usize>) -> Vec<(RecordId, RecordId)> {
        let mut pairs = BTreeSet::new();
        let mut skipped = 0usize;

        for members in self.blocks.values() {
            if max_block_size.is_some_and(|max| members.len() > max) {
                skipped += 1;
                continue;
            }
            for (i, &a) in members.iter().enumerate() {
                for &b in &members[i + 1..] {
                    pairs.insert((a.min(b), a.max(b)));
                }
            }
        }

        if skipped > 0 {
            debug!("Skipped {} oversized blocks", skipped);
        }

        pairs.into_iter().collect()
    }
}

/// Choose blocking predicates from labeled examples.
///
/// Greedy set cover over labeled matches: each round takes the predicate
/// covering the most still-uncovered matches, breaking ties by fewer covered
/// distinct pairs and then by predicate order. Without labeled matches the
/// whole-value predicates of every field are used. When some labeled matches
/// stay uncovered, the whole-value predicates are appended so the learned
/// set never blocks away every pair.
pub fn learn_predicates(
    schema: &FieldSchema,
    training: &TrainingData,
    max_predicates: usize,
) -> Vec<Predicate> {
    if training.matches.is_empty() {
        return default_predicates(schema);
    }

    let candidates = candidate_predicates(schema);
    let coverage: Vec<(Vec<usize>, usize)> = candidates
        .iter()
        .map(|p| {
            let matches = training
                .matches
                .iter()
                .enumerate()
                .filter(|(_, (a, b))| p.covers(a, b))
                .map(|(i, _)| i)
                .collect();
            let distinct = training.distinct.iter().filter(|(a, b)| p.covers(a, b)).count();
            (matches, distinct)
        })
        .collect();

    let mut uncovered: BTreeSet<usize> = (0..training.matches.len()).collect();
    let mut chosen: Vec<usize> = Vec::new();

    while !uncovered.is_empty() && chosen.len() < max_predicates {
        let best = coverage
            .iter()
            .enumerate()
            .filter(|(idx, _)| !chosen.contains(idx))
            .map(|(idx, (matches, distinct))| {
                let new = matches.iter().filter(|m| uncovered.contains(m)).count();
                (idx, new, *distinct)
            })
            .filter(|&(_, new, _)| new > 0)
            .min_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)).then(a.0.cmp(&b.0)));

        match best {
            Some((idx, _, _)) => {
                for m in &coverage[idx].0 {
                    uncovered.remove(m);
                }
                chosen.push(idx);
            }
            None => break,
        }
    }

    let mut predicates: Vec<Predicate> = chosen.into_iter().map(|idx| candidates[idx].clone()).collect();

    if !uncovered.is_empty() {
        warn!(
            "{} labeled matches are not covered by any blocking predicate; adding whole-value predicates",
            uncovered.len()
        );
        for fallback in default_predicates(schema) {
            if !predicates.contains(&fallback) {
                predicates.push(fallback);
            }
        }
    }

    debug!(
        "Learned blocking predicates: {}",
        predicates.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(", ")
    );
    predicates
}
