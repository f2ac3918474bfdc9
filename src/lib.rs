//! # dedupx
//!
//! Deduplicates the records of a CSV file: learns what a duplicate looks like
//! from a short interactive labeling session, clusters the records, and writes
//! the input back out with a cluster ID, a confidence score and canonical
//! values for every row.
//!
//! ## Quick Start
//!
//! ```bash
//! dedupx --input Samples/clean_sample.csv --output Output/sampleoutput.csv
//! ```
//!
//! The first run asks yes/no questions about candidate pairs, then stores the
//! labels (`csv_example_training.json`) and the learned settings
//! (`csv_example_learned_settings`). Later runs find the settings and skip
//! labeling.
//!
//! ## As a Library
//!
//! ```rust,no_run
//! use dedupx::prelude::*;
//!
//! let config = PipelineConfig::default();
//! let stdin = std::io::stdin();
//! let mut oracle = ConsoleOracle::new(stdin.lock(), std::io::stderr());
//! let summary = dedupx::run(&config, &mut oracle).unwrap();
//! println!("{} clusters", summary.clusters);
//! ```
//!
//! ## Crate Structure
//!
//! - [`dedupx-core`](https://docs.rs/dedupx-core) - Records, datasets, normalization, training examples
//! - [`dedupx-similarity`](https://docs.rs/dedupx-similarity) - Field schema, comparators, blocking predicates
//! - [`dedupx-engine`](https://docs.rs/dedupx-engine) - Active learning, classifier, threshold, clustering
//! - [`dedupx-storage`](https://docs.rs/dedupx-storage) - Settings and training persistence

pub mod config;
pub mod console;
pub mod loader;
pub mod pipeline;
pub mod writer;

// Re-export core types
pub use dedupx_core::{
    normalize_field,
    Dataset, Record, RecordId,
    Label, RecordPair, TrainingData,
    Error, Result,
};

// Re-export similarity and engine
pub use dedupx_similarity::{FieldDefinition, FieldSchema, FieldType};
pub use dedupx_engine::{
    Cluster, Dedupe, StaticDedupe, Matcher,
    LabelOracle, LabelContext, LearnedSettings,
};

// Re-export storage
pub use dedupx_storage::ArtifactStore;

pub use config::PipelineConfig;
pub use console::ConsoleOracle;
pub use pipeline::{run, EngineMode, RunSummary};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Dataset, Record, RecordId,
        Label, TrainingData,
        FieldDefinition, FieldSchema, FieldType,
        Dedupe, StaticDedupe, Matcher,
        LabelOracle, LearnedSettings,
        ArtifactStore,
        PipelineConfig, ConsoleOracle,
        EngineMode, RunSummary,
    };
}
