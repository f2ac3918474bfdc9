//! Pipeline configuration

use dedupx_core::{Error, Result};
use dedupx_engine::EngineOptions;
use dedupx_similarity::{FieldDefinition, FieldSchema};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT: &str = "Samples/clean_sample.csv";
pub const DEFAULT_OUTPUT: &str = "Output/sampleoutput.csv";
pub const DEFAULT_SETTINGS: &str = "csv_example_learned_settings";
pub const DEFAULT_TRAINING: &str = "csv_example_training.json";
pub const DEFAULT_SAMPLE_SIZE: usize = 15000;
pub const DEFAULT_RECALL_WEIGHT: f64 = 1.5;

/// Everything one deduplication run needs
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Input CSV with a header row
    pub input: PathBuf,
    /// Augmented output CSV
    pub output: PathBuf,
    /// Learned settings blob; its presence skips training
    pub settings_path: PathBuf,
    /// Labeled examples, read before and written after training
    pub training_path: PathBuf,
    /// Compared fields
    pub schema: FieldSchema,
    /// Candidate pairs drawn for active learning
    pub sample_size: usize,
    /// F-beta weight of recall against precision
    pub recall_weight: f64,
    pub engine: EngineOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            settings_path: PathBuf::from(DEFAULT_SETTINGS),
            training_path: PathBuf::from(DEFAULT_TRAINING),
            schema: restaurant_schema(),
            sample_size: DEFAULT_SAMPLE_SIZE,
            recall_weight: DEFAULT_RECALL_WEIGHT,
            engine: EngineOptions::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        self.schema.validate()?;
        if self.sample_size == 0 {
            return Err(Error::InvalidConfig("sample size must be positive".into()));
        }
        if !(self.recall_weight > 0.0 && self.recall_weight.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "recall weight must be positive, got {}",
                self.recall_weight
            )));
        }
        Ok(())
    }
}

/// Restaurant listing fields: name, address, city and cuisine
pub fn restaurant_schema() -> FieldSchema {
    FieldSchema::new(vec![
        FieldDefinition::string("name"),
        FieldDefinition::string("address"),
        FieldDefinition::string("city"),
        FieldDefinition::string("cuisine"),
    ])
}

/// Load a schema file: a JSON list of `{"field": ..., "type": ...}` objects
pub fn load_schema(path: &Path) -> Result<FieldSchema> {
    let file = File::open(path)?;
    let fields: Vec<FieldDefinition> = serde_json::from_reader(BufReader::new(file))?;
    let schema = FieldSchema::new(fields);
    schema.validate()?;
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.schema.fields.len(), 4);
        assert_eq!(config.sample_size, 15000);
    }

    #[test]
    fn test_rejects_bad_recall_weight() {
        let config = PipelineConfig {
            recall_weight: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_load_schema_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"field": "name", "type": "String"}}, {{"field": "zip", "type": "ShortString"}}]"#).unwrap();

        let schema = load_schema(file.path()).unwrap();
        assert_eq!(schema.field_names().collect::<Vec<_>>(), vec!["name", "zip"]);
    }

    #[test]
    fn test_load_empty_schema_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();
        assert!(matches!(load_schema(file.path()), Err(Error::InvalidConfig(_))));
    }
}
