//! Result writing
//!
//! Joins cluster assignments back onto the original input rows. Original
//! values are re-read from the input file so the output keeps them exactly
//! as they were; only the canonical columns carry normalized values.

use crate::loader::csv_error;
use dedupx_core::{Dataset, Record, RecordId, Result};
use dedupx_engine::{canonicalize, Cluster};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::warn;

pub const CLUSTER_ID_COLUMN: &str = "Cluster ID";
pub const CONFIDENCE_COLUMN: &str = "confidence_score";
pub const CANONICAL_PREFIX: &str = "canonical_";

/// Cluster assignment of one clustered record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MembershipEntry {
    pub cluster_id: usize,
    pub confidence: f64,
}

/// Cluster assignments for every clustered record plus each cluster's
/// canonical representation
#[derive(Debug, Clone, Default)]
pub struct ClusterMembership {
    entries: BTreeMap<RecordId, MembershipEntry>,
    canonicals: Vec<Record>,
}

impl ClusterMembership {
    /// Assign cluster IDs in cluster order and canonicalize each cluster
    pub fn from_clusters(clusters: &[Cluster], dataset: &Dataset) -> Result<Self> {
        let mut entries = BTreeMap::new();
        let mut canonicals = Vec::with_capacity(clusters.len());

        for (cluster_id, cluster) in clusters.iter().enumerate() {
            let members = cluster
                .members
                .iter()
                .map(|&id| dataset.record(id))
                .collect::<Result<Vec<_>>>()?;
            canonicals.push(canonicalize(&members));

            for (record_id, confidence) in cluster.iter() {
                entries.insert(record_id, MembershipEntry { cluster_id, confidence });
            }
        }

        Ok(Self { entries, canonicals })
    }

    pub fn get(&self, id: RecordId) -> Option<&MembershipEntry> {
        self.entries.get(&id)
    }

    pub fn canonical(&self, cluster_id: usize) -> Option<&Record> {
        self.canonicals.get(cluster_id)
    }

    pub fn cluster_count(&self) -> usize {
        self.canonicals.len()
    }

    pub fn clustered_records(&self) -> usize {
        self.entries.len()
    }

    /// First ID available to singletons, one past the highest cluster ID
    pub fn first_singleton_id(&self) -> usize {
        self.canonicals.len()
    }

    /// Canonical column keys, fixed by the first cluster, in input column order.
    ///
    /// Without any cluster every input column is used.
    pub fn canonical_keys(&self, columns: &[String]) -> Vec<String> {
        match self.canonicals.first() {
            Some(first) => columns
                .iter()
                .filter(|c| first.contains_field(c))
                .cloned()
                .collect(),
            None => {
                warn!("No duplicate clusters found; canonical columns mirror the input columns");
                columns.to_vec()
            }
        }
    }
}

/// Row counts of a written result file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub rows: usize,
    pub clustered: usize,
    pub singletons: usize,
}

/// Write the augmented CSV for `input` to `output`.
pub fn write_results(
    input: &Path,
    output: &Path,
    membership: &ClusterMembership,
    dataset: &Dataset,
) -> Result<WriteSummary> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let source = File::open(input)?;
    let sink = File::create(output)?;
    write_results_to(source, sink, membership, dataset)
}

/// Stream version of [`write_results`].
///
/// Output columns: cluster ID, confidence, the original columns, then one
/// `canonical_<key>` column per canonical key. Records outside every cluster
/// get a fresh singleton ID, confidence 0, and their own normalized values
/// as canonical values.
pub fn write_results_to<R: Read, W: Write>(
    input: R,
    output: W,
    membership: &ClusterMembership,
    dataset: &Dataset,
) -> Result<WriteSummary> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(input);
    let mut writer = csv::Writer::from_writer(output);

    let headers = reader.headers().map_err(csv_error)?.clone();
    let columns: Vec<String> = headers.iter().map(str::to_string).collect();
    let canonical_keys = membership.canonical_keys(&columns);

    let mut heading: Vec<String> = vec![CLUSTER_ID_COLUMN.to_string(), CONFIDENCE_COLUMN.to_string()];
    heading.extend(columns.iter().cloned());
    heading.extend(canonical_keys.iter().map(|k| format!("{}{}", CANONICAL_PREFIX, k)));
    writer.write_record(&heading).map_err(csv_error)?;

    let mut summary = WriteSummary::default();
    let mut next_singleton = membership.first_singleton_id();

    for (row_id, row) in reader.records().enumerate() {
        let row = row.map_err(csv_error)?;

        let (cluster_id, confidence, canonical) = match membership.get(row_id) {
            Some(entry) => {
                summary.clustered += 1;
                (
                    entry.cluster_id,
                    entry.confidence.to_string(),
                    membership.canonical(entry.cluster_id),
                )
            }
            None => {
                summary.singletons += 1;
                let id = next_singleton;
                next_singleton += 1;
                (id, "0".to_string(), dataset.get(row_id))
            }
        };

        let mut out: Vec<String> = Vec::with_capacity(heading.len());
        out.push(cluster_id.to_string());
        out.push(confidence);
        out.extend(row.iter().map(str::to_string));
        out.extend(canonical_keys.iter().map(|key| {
            canonical
                .and_then(|c| c.get(key))
                .unwrap_or_default()
                .to_string()
        }));

        writer.write_record(&out).map_err(csv_error)?;
        summary.rows += 1;
    }

    writer.flush()?;
    Ok(summary)
}
