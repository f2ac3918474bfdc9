use anyhow::{Context, Result};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use dedupx_core::TrainingData;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

/// Write labeled examples as pretty-printed JSON
pub fn write_training(path: &Path, training: &TrainingData) -> Result<()> {
    let json = serde_json::to_vec_pretty(training)?;
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(&json))
        .with_context(|| format!("writing training examples to {:?}", path))?;
    Ok(())
}

pub fn read_training(path: &Path) -> Result<TrainingData> {
    let file = File::open(path).with_context(|| format!("opening training examples {:?}", path))?;
    let training = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing training examples {:?}", path))?;
    Ok(training)
}
