//! Clustering of scored pairs
//!
//! Pairs at or above the threshold link records into connected components.
//! Each component is then split by average-linkage agglomerative clustering,
//! so a chain of weak links does not glue unrelated records together.

use dedupx_core::RecordId;
use std::collections::{BTreeMap, HashMap};

/// A candidate pair with its match probability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredPair {
    pub a: RecordId,
    pub b: RecordId,
    pub probability: f64,
}

impl ScoredPair {
    pub fn new(a: RecordId, b: RecordId, probability: f64) -> Self {
        Self {
            a: a.min(b),
            b: a.max(b),
            probability,
        }
    }
}

/// A group of records judged to be the same entity
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Member record IDs, ascending
    pub members: Vec<RecordId>,
    /// Confidence per member, parallel to `members`
    pub scores: Vec<f64>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// `(record, confidence)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (RecordId, f64)> + '_ {
        self.members.iter().copied().zip(self.scores.iter().copied())
    }
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            let (lo, hi) = (ra.min(rb), ra.max(rb));
            self.parent[hi] = lo;
        }
    }
}

/// Cluster scored pairs at a threshold.
///
/// Returns clusters of two or more records ordered by smallest member.
/// Records without any pair at or above the threshold are left out.
pub fn cluster_pairs(pairs: &[ScoredPair], threshold: f64) -> Vec<Cluster> {
    let edges: Vec<&ScoredPair> = pairs.iter().filter(|p| p.probability >= threshold).collect();
    if edges.is_empty() {
        return Vec::new();
    }

    // Dense node numbering in record order
    let mut nodes: BTreeMap<RecordId, usize> = BTreeMap::new();
    for edge in &edges {
        nodes.insert(edge.a, 0);
        nodes.insert(edge.b, 0);
    }
    for (idx, slot) in nodes.values_mut().enumerate() {
        *slot = idx;
    }
    let ids: Vec<RecordId> = nodes.keys().copied().collect();

    let mut uf = UnionFind::new(ids.len());
    let mut similarity: HashMap<(usize, usize), f64> = HashMap::new();
    for edge in &edges {
        let (a, b) = (nodes[&edge.a], nodes[&edge.b]);
        uf.union(a, b);
        similarity.insert((a, b), edge.probability);
    }

    let mut components: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for node in 0..ids.len() {
        let root = uf.find(node);
        components.entry(root).or_default().push(node);
    }

    let mut clusters: Vec<Cluster> = components
        .into_values()
        .flat_map(|component| split_component(&component, &similarity, threshold))
        .filter(|group| group.len() > 1)
        .map(|group| {
            let scores = group.iter().map(|&n| member_confidence(n, &group, &similarity)).collect();
            Cluster {
                members: group.iter().map(|&n| ids[n]).collect(),
                scores,
            }
        })
        .collect();

    clusters.sort_by_key(|c| c.members[0]);
    clusters
}

#[inline]
fn pair_similarity(similarity: &HashMap<(usize, usize), f64>, a: usize, b: usize) -> f64 {
    similarity.get(&(a.min(b), a.max(b))).copied().unwrap_or(0.0)
}

/// Average-linkage agglomeration inside one component, stopping below threshold
fn split_component(
    component: &[usize],
    similarity: &HashMap<(usize, usize), f64>,
    threshold: f64,
) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = component.iter().map(|&n| vec![n]).collect();
    if groups.len() <= 2 {
        return vec![component.to_vec()];
    }

    loop {
        let mut best: Option<(usize, usize, f64)> = None;
        for i in 0..groups.len() {
            for j in i + 1..groups.len() {
                let total: f64 = groups[i]
                    .iter()
                    .flat_map(|&a| groups[j].iter().map(move |&b| (a, b)))
                    .map(|(a, b)| pair_similarity(similarity, a, b))
                    .sum();
                let avg = total / (groups[i].len() * groups[j].len()) as f64;
                if best.map_or(true, |(_, _, s)| avg > s) {
                    best = Some((i, j, avg));
                }
            }
        }

        match best {
            Some((i, j, avg)) if avg >= threshold => {
                let merged = groups.remove(j);
                groups[i].extend(merged);
                groups[i].sort_unstable();
            }
            _ => break,
        }
    }

    groups
}

/// Mean probability from a member to every other member of its cluster
fn member_confidence(node: usize, group: &[usize], similarity: &HashMap<(usize, usize), f64>) -> f64 {
    let others: Vec<f64> = group
        .iter()
        .filter(|&&other| other != node)
        .map(|&other| pair_similarity(similarity, node, other))
        .collect();
    if others.is_empty() {
        0.0
    } else {
        others.iter().sum::<f64>() / others.len() as f64
    }
}
