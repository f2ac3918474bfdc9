//! Active learning
//!
//! Repeatedly shows the labeling oracle the candidate pair the current model
//! is least sure about, until the oracle finishes or the pool runs dry.

use crate::dedupe::Dedupe;
use dedupx_core::{Label, RecordPair, Result};
use dedupx_similarity::FieldComparison;
use tracing::{debug, info};

/// What the oracle sees alongside a candidate pair
#[derive(Debug, Clone)]
pub struct LabelContext {
    /// Per-field comparison of the pair, in schema order
    pub comparisons: Vec<FieldComparison>,
    /// Labeled matches so far
    pub matches: usize,
    /// Labeled distinct pairs so far
    pub distinct: usize,
    /// Candidates left in the pool
    pub remaining: usize,
}

/// Source of duplicate/distinct judgements for candidate pairs.
///
/// Implementations may block indefinitely (a human at a console).
pub trait LabelOracle {
    fn label(&mut self, pair: &RecordPair, context: &LabelContext) -> Result<Label>;
}

/// Outcome of a labeling session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelingSummary {
    pub matches: usize,
    pub distinct: usize,
    pub unsure: usize,
    /// The oracle ended the session before the pool was exhausted
    pub finished_early: bool,
}

/// Run the labeling loop against an oracle.
pub fn active_label<O: LabelOracle + ?Sized>(deduper: &mut Dedupe, oracle: &mut O) -> Result<LabelingSummary> {
    let mut summary = LabelingSummary::default();

    while let Some(pair) = deduper.uncertain_pair() {
        let context = LabelContext {
            comparisons: deduper.comparator().explain(&pair.0, &pair.1),
            matches: deduper.training_data().matches.len(),
            distinct: deduper.training_data().distinct.len(),
            remaining: deduper.candidate_count(),
        };

        let label = oracle.label(&pair, &context)?;
        debug!("Oracle answered {:?}", label);

        match label {
            Label::Finished => {
                summary.finished_early = true;
                break;
            }
            Label::Unsure => summary.unsure += 1,
            Label::Match => {
                summary.matches += 1;
                deduper.mark_pair(pair, label)?;
            }
            Label::Distinct => {
                summary.distinct += 1;
                deduper.mark_pair(pair, label)?;
            }
        }
    }

    info!(
        "Labeling finished: {} match, {} distinct, {} unsure",
        summary.matches, summary.distinct, summary.unsure
    );
    Ok(summary)
}
