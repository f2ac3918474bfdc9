use crate::settings::{read_settings, write_settings};
use crate::training::{read_training, write_training};
use anyhow::Result;
use dedupx_core::TrainingData;
use dedupx_engine::LearnedSettings;
use std::path::{Path, PathBuf};
use tracing::info;

/// The two artifacts that survive between runs
///
/// Learned settings switch the pipeline to static mode; training examples
/// seed the next labeling session. Clustering results are never stored.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    settings_path: PathBuf,
    training_path: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(settings_path: P, training_path: Q) -> Self {
        Self {
            settings_path: settings_path.as_ref().to_path_buf(),
            training_path: training_path.as_ref().to_path_buf(),
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    pub fn training_path(&self) -> &Path {
        &self.training_path
    }

    pub fn has_settings(&self) -> bool {
        self.settings_path.exists()
    }

    /// Load learned settings if the artifact exists
    pub fn load_settings(&self) -> Result<Option<LearnedSettings>> {
        if !self.has_settings() {
            return Ok(None);
        }
        info!("Reading from {:?}", self.settings_path);
        read_settings(&self.settings_path).map(Some)
    }

    /// Load training examples if the artifact exists
    pub fn load_training(&self) -> Result<Option<TrainingData>> {
        if !self.training_path.exists() {
            return Ok(None);
        }
        info!("Reading labeled examples from {:?}", self.training_path);
        read_training(&self.training_path).map(Some)
    }

    /// Persist the outcome of a training session.
    ///
    /// Training examples are written first; a failure writing the settings
    /// afterwards leaves the examples in place.
    pub fn save(&self, training: &TrainingData, settings: &LearnedSettings) -> Result<()> {
        write_training(&self.training_path, training)?;
        write_settings(&self.settings_path, settings)?;
        info!(
            "Saved {} training examples and settings",
            training.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{decode_settings, encode_settings};
    use dedupx_core::{Label, Record};
    use dedupx_engine::{Classifier, TrainOptions};
    use dedupx_similarity::{FieldDefinition, FieldSchema, Predicate, PredicateKind};

    fn rec(name: &str) -> Record {
        Record::from_raw([("name", name)])
    }

    fn training() -> TrainingData {
        let mut training = TrainingData::new();
        training.add((rec("fenix"), rec("fenix")), Label::Match);
        training.add((rec("fenix"), rec("spago")), Label::Distinct);
        training
    }

    fn settings() -> LearnedSettings {
        let schema = FieldSchema::new(vec![FieldDefinition::string("name")]);
        let examples = vec![
            dedupx_engine::Example { features: vec![1.0], is_match: true },
            dedupx_engine::Example { features: vec![0.2], is_match: false },
        ];
        LearnedSettings {
            schema,
            classifier: Classifier::fit(&examples, TrainOptions::default()).unwrap(),
            predicates: vec![Predicate::new("name", PredicateKind::WholeField)],
        }
    }

    #[test]
    fn test_missing_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("settings"), dir.path().join("training.json"));

        assert!(!store.has_settings());
        assert!(store.load_settings().unwrap().is_none());
        assert!(store.load_training().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("settings"), dir.path().join("training.json"));

        store.save(&training(), &settings()).unwrap();

        assert!(store.has_settings());
        assert_eq!(store.load_settings().unwrap(), Some(settings()));
        assert_eq!(store.load_training().unwrap(), Some(training()));
    }

    #[test]
    fn test_training_file_is_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("settings"), dir.path().join("training.json"));
        store.save(&training(), &settings()).unwrap();

        let text = std::fs::read_to_string(store.training_path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["match"][0][1]["name"], "fenix");
        assert_eq!(value["distinct"][0][1]["name"], "spago");
    }

    #[test]
    fn test_bad_header_rejected() {
        let mut data = encode_settings(&settings()).unwrap();
        data[0] = b'X';
        let err = decode_settings(&data).unwrap_err();
        assert!(err.to_string().contains("bad header"));
    }

    #[test]
    fn test_unwritable_settings_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(
            dir.path().join("missing-dir").join("settings"),
            dir.path().join("training.json"),
        );

        assert!(store.save(&training(), &settings()).is_err());
        // Examples written before the failure are kept
        assert!(store.training_path().exists());
    }
}
