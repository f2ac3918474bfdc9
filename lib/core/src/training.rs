//! Labeled record pairs used to train the pair classifier.

use crate::record::Record;
use serde::{Deserialize, Serialize};

/// A pair of records as shown to the labeler.
pub type RecordPair = (Record, Record);

/// Answer given by a labeling oracle for one candidate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// The two records describe the same entity.
    Match,
    /// The two records describe different entities.
    Distinct,
    /// Skip the pair without recording a label.
    Unsure,
    /// Stop labeling.
    Finished,
}

/// Accumulated training examples. Persisted as JSON between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingData {
    #[serde(rename = "match", default)]
    pub matches: Vec<RecordPair>,
    #[serde(default)]
    pub distinct: Vec<RecordPair>,
}

impl TrainingData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a label for a pair. `Unsure` and `Finished` are ignored.
    pub fn add(&mut self, pair: RecordPair, label: Label) {
        match label {
            Label::Match => self.matches.push(pair),
            Label::Distinct => self.distinct.push(pair),
            Label::Unsure | Label::Finished => {}
        }
    }

    /// Merge another set of examples into this one.
    pub fn extend(&mut self, other: TrainingData) {
        self.matches.extend(other.matches);
        self.distinct.extend(other.distinct);
    }

    pub fn len(&self) -> usize {
        self.matches.len() + self.distinct.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty() && self.distinct.is_empty()
    }

    /// Whether both classes are represented.
    pub fn is_trainable(&self) -> bool {
        !self.matches.is_empty() && !self.distinct.is_empty()
    }
}
