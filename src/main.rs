use clap::Parser;
use dedupx::config::{
    load_schema, PipelineConfig, DEFAULT_INPUT, DEFAULT_OUTPUT, DEFAULT_RECALL_WEIGHT,
    DEFAULT_SAMPLE_SIZE, DEFAULT_SETTINGS, DEFAULT_TRAINING,
};
use dedupx::{ConsoleOracle, EngineMode};
use dedupx_engine::EngineOptions;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Deduplicate the records of a CSV file
#[derive(Parser, Debug)]
#[command(name = "dedupx")]
#[command(about = "Find and cluster duplicate records in a CSV file", long_about = None)]
struct Args {
    /// Input CSV file (header row required)
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Output CSV file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Learned settings file; when present, labeling is skipped
    #[arg(long, default_value = DEFAULT_SETTINGS)]
    settings: PathBuf,

    /// Labeled training examples (JSON)
    #[arg(long, default_value = DEFAULT_TRAINING)]
    training: PathBuf,

    /// Field schema (JSON list of {"field", "type"}); defaults to the restaurant fields
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Candidate pairs sampled for labeling
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    sample_size: usize,

    /// How much more recall matters than precision when picking the threshold
    #[arg(long, default_value_t = DEFAULT_RECALL_WEIGHT)]
    recall_weight: f64,

    /// Seed for pair sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting dedupx v{}", env!("CARGO_PKG_VERSION"));

    let mut config = PipelineConfig {
        input: args.input,
        output: args.output,
        settings_path: args.settings,
        training_path: args.training,
        sample_size: args.sample_size,
        recall_weight: args.recall_weight,
        ..Default::default()
    };
    if let Some(path) = args.schema {
        config.schema = load_schema(&path)?;
    }
    if let Some(seed) = args.seed {
        config.engine = EngineOptions { seed, ..config.engine };
    }

    let stdin = std::io::stdin();
    let mut oracle = ConsoleOracle::new(stdin.lock(), std::io::stderr());
    let summary = dedupx::run(&config, &mut oracle)?;

    let mode = match summary.mode {
        EngineMode::Static => "static settings",
        EngineMode::Trained => "fresh training",
    };
    info!(
        "Done ({}): {} rows, {} duplicate sets, {} singletons",
        mode, summary.written.rows, summary.clusters, summary.written.singletons
    );
    Ok(())
}
