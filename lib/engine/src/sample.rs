//! Candidate pair sampling for active learning
//!
//! Half of the sample comes from blocked pairs (records sharing some block
//! key, so likely duplicates are represented), the rest from uniformly random
//! pairs (so obvious non-duplicates are represented too).

use crate::blocking::BlockIndex;
use dedupx_core::{Dataset, RecordId};
use dedupx_similarity::Predicate;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::BTreeSet;

/// Random draws attempted per requested random pair before giving up
const RANDOM_ATTEMPTS_PER_PAIR: usize = 10;

/// Draw up to `sample_size` distinct record pairs, sorted ascending.
pub fn sample_pairs(
    dataset: &Dataset,
    predicates: &[Predicate],
    sample_size: usize,
    max_block_size: usize,
    rng: &mut StdRng,
) -> Vec<(RecordId, RecordId)> {
    let n = dataset.len();
    if n < 2 || sample_size == 0 {
        return Vec::new();
    }

    let total_pairs = n.saturating_mul(n - 1) / 2;
    if sample_size >= total_pairs {
        return (0..n).flat_map(|a| (a + 1..n).map(move |b| (a, b))).collect();
    }

    let target = sample_size;
    let blocked_target = target / 2;

    let index = BlockIndex::build(dataset, predicates);
    let mut blocked = index.candidate_pairs(Some(max_block_size));
    partial_shuffle(&mut blocked, blocked_target, rng);
    blocked.truncate(blocked_target);

    let mut sample: BTreeSet<(RecordId, RecordId)> = blocked.into_iter().collect();

    let mut attempts = 0;
    let max_attempts = target.saturating_mul(RANDOM_ATTEMPTS_PER_PAIR);
    while sample.len() < target && attempts < max_attempts {
        attempts += 1;
        let a = rng.random_range(0..n);
        let b = rng.random_range(0..n);
        if a != b {
            sample.insert((a.min(b), a.max(b)));
        }
    }

    sample.into_iter().collect()
}

/// Move a uniformly chosen subset of `amount` items to the front
fn partial_shuffle<T>(items: &mut [T], amount: usize, rng: &mut StdRng) {
    let len = items.len();
    for i in 0..amount.min(len) {
        let j = rng.random_range(i..len);
        items.swap(i, j);
    }
}
