//! # dedupx Engine
//!
//! Record-linkage engine: learns which record pairs are duplicates from a
//! handful of human labels, then clusters a whole dataset.
//!
//! ## Lifecycle
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌───────────┐   ┌──────────┐
//! │  sample  │──>│  label   │──>│  train   │──>│ threshold │──>│  match   │
//! │ (pairs)  │   │ (oracle) │   │ (model)  │   │ (F-beta)  │   │(clusters)│
//! └──────────┘   └──────────┘   └──────────┘   └───────────┘   └──────────┘
//!                                     │                ▲
//!                                     ▼                │
//!                              LearnedSettings ──> StaticDedupe
//! ```
//!
//! - [`Dedupe`] samples candidate pairs, runs [`active_label`] against a
//!   [`LabelOracle`] and trains a [`Classifier`] plus blocking predicates.
//! - [`StaticDedupe`] wraps [`LearnedSettings`] from a previous run and skips
//!   labeling entirely.
//! - Both implement [`Matcher`]: [`Matcher::threshold`] and
//!   [`Matcher::match_records`].
//! - [`canonicalize`] merges a cluster into one representative record.

pub mod active;
pub mod blocking;
pub mod canonical;
pub mod classifier;
pub mod cluster;
pub mod dedupe;
pub mod sample;
pub mod settings;
pub mod threshold;

pub use active::{active_label, LabelContext, LabelOracle, LabelingSummary};
pub use blocking::{learn_predicates, BlockIndex};
pub use canonical::canonicalize;
pub use classifier::{Classifier, Example, TrainOptions};
pub use cluster::{cluster_pairs, Cluster, ScoredPair};
pub use dedupe::{Dedupe, EngineOptions, Matcher, StaticDedupe};
pub use settings::LearnedSettings;
pub use threshold::fbeta_threshold;
