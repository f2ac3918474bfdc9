//! Learned settings
//!
//! Everything a static (inference-only) run needs: the field schema, the
//! trained pair classifier, and the learned blocking predicates.

use crate::blocking::BlockIndex;
use crate::classifier::Classifier;
use crate::cluster::ScoredPair;
use dedupx_core::{Dataset, Result};
use dedupx_similarity::{Comparator, FieldSchema, Predicate};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnedSettings {
    pub schema: FieldSchema,
    pub classifier: Classifier,
    pub predicates: Vec<Predicate>,
}

impl LearnedSettings {
    /// Block the dataset and score every candidate pair, in pair order.
    pub fn score_pairs(&self, dataset: &Dataset) -> Result<Vec<ScoredPair>> {
        self.schema.validate_columns(dataset.columns())?;

        let comparator = Comparator::new(self.schema.clone());
        let index = BlockIndex::build(dataset, &self.predicates);
        let pairs = index.candidate_pairs(None);
        debug!("{} blocks yield {} candidate pairs", index.block_count(), pairs.len());

        pairs
            .into_iter()
            .map(|(a, b)| {
                let features = comparator.features(dataset.record(a)?, dataset.record(b)?);
                Ok(ScoredPair::new(a, b, self.classifier.predict(&features)))
            })
            .collect()
    }
}
