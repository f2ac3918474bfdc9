//! End-to-end deduplication run
//!
//! load -> (read settings | sample, label, train, persist) -> threshold ->
//! cluster -> write. Each stage consumes the previous stage's full output;
//! nothing is persisted mid-run except the training artifacts.

use crate::config::PipelineConfig;
use crate::loader::load_dataset;
use crate::writer::{write_results, ClusterMembership, WriteSummary};
use anyhow::{Context, Result};
use dedupx_engine::{active_label, Dedupe, LabelOracle, Matcher, StaticDedupe};
use dedupx_storage::ArtifactStore;
use tracing::info;

/// How the engine was obtained for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    /// Settings were loaded from disk; no labeling happened
    Static,
    /// Settings were trained in this run
    Trained,
}

/// Outcome of a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub mode: EngineMode,
    pub threshold: f64,
    pub clusters: usize,
    pub written: WriteSummary,
}

/// Run the whole pipeline. The oracle is only consulted when no learned
/// settings exist yet.
pub fn run<O: LabelOracle + ?Sized>(config: &PipelineConfig, oracle: &mut O) -> Result<RunSummary> {
    config.validate()?;

    info!("Importing data from {:?}", config.input);
    let dataset = load_dataset(&config.input)
        .with_context(|| format!("loading input {:?}", config.input))?;
    info!("Imported {} records", dataset.len());

    let store = ArtifactStore::new(&config.settings_path, &config.training_path);
    let (engine, mode) = match store.load_settings()? {
        Some(settings) => (StaticDedupe::new(settings)?, EngineMode::Static),
        None => (train(config, &store, &dataset, oracle)?, EngineMode::Trained),
    };

    let threshold = engine.threshold(&dataset, config.recall_weight)?;
    info!("Threshold value: {}", threshold);

    info!("Clustering...");
    let clusters = engine.match_records(&dataset, threshold)?;
    info!("# duplicate sets: {}", clusters.len());

    let membership = ClusterMembership::from_clusters(&clusters, &dataset)?;

    info!("Writing to output file {:?}", config.output);
    let written = write_results(&config.input, &config.output, &membership, &dataset)
        .with_context(|| format!("writing output {:?}", config.output))?;

    Ok(RunSummary {
        mode,
        threshold,
        clusters: clusters.len(),
        written,
    })
}

fn train<O: LabelOracle + ?Sized>(
    config: &PipelineConfig,
    store: &ArtifactStore,
    dataset: &dedupx_core::Dataset,
    oracle: &mut O,
) -> Result<StaticDedupe> {
    let mut deduper = Dedupe::with_options(config.schema.clone(), config.engine)?;
    deduper.sample(dataset, config.sample_size)?;

    if let Some(training) = store.load_training()? {
        deduper.read_training(training)?;
    }

    info!("Starting active labeling...");
    active_label(&mut deduper, oracle)?;

    let settings = deduper.train()?.clone();
    store.save(deduper.training_data(), &settings)?;

    Ok(StaticDedupe::new(settings)?)
}
