//! Canonicalization of clusters
//!
//! Builds one representative record per cluster. For each field the most
//! central present value wins: the one with the smallest total edit distance
//! to the other members' values.

use dedupx_core::Record;

/// Merge cluster members into a single representative record.
///
/// The result has the union of the members' field names. A field that is
/// absent in every member stays absent. Ties go to the earliest member.
pub fn canonicalize(members: &[&Record]) -> Record {
    let mut keys: Vec<&String> = members.iter().flat_map(|r| r.fields().keys()).collect();
    keys.sort_unstable();
    keys.dedup();

    keys.into_iter()
        .map(|key| {
            let values: Vec<&str> = members.iter().filter_map(|r| r.get(key)).collect();
            (key.clone(), most_central(&values).map(str::to_string))
        })
        .collect()
}

fn most_central<'a>(values: &[&'a str]) -> Option<&'a str> {
    let mut best: Option<(&str, f64)> = None;
    for &candidate in values {
        let cost: f64 = values
            .iter()
            .map(|&other| 1.0 - strsim::normalized_levenshtein(candidate, other))
            .sum();
        if best.map_or(true, |(_, c)| cost < c) {
            best = Some((candidate, cost));
        }
    }
    best.map(|(value, _)| value)
}
