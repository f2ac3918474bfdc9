//! Deduplication engines
//!
//! [`Dedupe`] is the trainable engine: it samples candidate pairs, collects
//! labels, and trains. [`StaticDedupe`] is built from previously learned
//! settings and only does inference. Both implement [`Matcher`] for
//! threshold selection and clustering.

use crate::blocking::learn_predicates;
use crate::classifier::{Classifier, Example, TrainOptions};
use crate::cluster::{cluster_pairs, Cluster};
use crate::sample::sample_pairs;
use crate::settings::LearnedSettings;
use crate::threshold::fbeta_threshold;
use dedupx_core::{Dataset, Error, Label, RecordPair, Result, TrainingData};
use dedupx_similarity::{candidate_predicates, Comparator, FieldSchema};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

/// Tuning knobs for the trainable engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    /// Seed for pair sampling
    pub seed: u64,
    /// Blocks larger than this are ignored while sampling
    pub max_block_size: usize,
    /// Upper bound on learned blocking predicates
    pub max_predicates: usize,
    pub train: TrainOptions,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            max_block_size: 500,
            max_predicates: 8,
            train: TrainOptions::default(),
        }
    }
}

/// Inference over learned settings
pub trait Matcher {
    /// Settings used for scoring; errors when the engine is not trained
    fn learned_settings(&self) -> Result<&LearnedSettings>;

    /// Threshold maximizing expected F-beta over the dataset's candidate pairs.
    ///
    /// `recall_weight` must be positive; values above 1 favor recall.
    fn threshold(&self, dataset: &Dataset, recall_weight: f64) -> Result<f64> {
        if !(recall_weight > 0.0 && recall_weight.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "recall weight must be positive, got {}",
                recall_weight
            )));
        }

        let scored = self.learned_settings()?.score_pairs(dataset)?;
        let probabilities: Vec<f64> = scored.iter().map(|p| p.probability).collect();
        let threshold = fbeta_threshold(&probabilities, recall_weight);
        debug!("Threshold {:.4} from {} candidate pairs", threshold, probabilities.len());
        Ok(threshold)
    }

    /// Cluster the dataset at a threshold. Singletons are not returned.
    fn match_records(&self, dataset: &Dataset, threshold: f64) -> Result<Vec<Cluster>> {
        let scored = self.learned_settings()?.score_pairs(dataset)?;
        Ok(cluster_pairs(&scored, threshold))
    }
}

struct Candidate {
    pair: RecordPair,
    features: Vec<f32>,
}

/// Trainable engine
pub struct Dedupe {
    comparator: Comparator,
    options: EngineOptions,
    candidates: Vec<Candidate>,
    training: TrainingData,
    active_model: Option<Classifier>,
    settings: Option<LearnedSettings>,
}

impl Dedupe {
    pub fn new(schema: FieldSchema) -> Result<Self> {
        Self::with_options(schema, EngineOptions::default())
    }

    pub fn with_options(schema: FieldSchema, options: EngineOptions) -> Result<Self> {
        schema.validate()?;
        Ok(Self {
            comparator: Comparator::new(schema),
            options,
            candidates: Vec::new(),
            training: TrainingData::new(),
            active_model: None,
            settings: None,
        })
    }

    pub fn comparator(&self) -> &Comparator {
        &self.comparator
    }

    pub fn training_data(&self) -> &TrainingData {
        &self.training
    }

    /// Unlabeled candidates left in the pool
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Draw the pool of candidate pairs for active learning.
    ///
    /// Fails when a schema field is not a column of the dataset.
    pub fn sample(&mut self, dataset: &Dataset, sample_size: usize) -> Result<usize> {
        self.comparator.schema().validate_columns(dataset.columns())?;

        let mut rng = StdRng::seed_from_u64(self.options.seed);
        let predicates = candidate_predicates(self.comparator.schema());
        let pairs = sample_pairs(
            dataset,
            &predicates,
            sample_size,
            self.options.max_block_size,
            &mut rng,
        );

        let mut candidates = Vec::with_capacity(pairs.len());
        for (a, b) in pairs {
            let pair = (dataset.record(a)?.clone(), dataset.record(b)?.clone());
            if !self.is_labeled(&pair) {
                let features = self.comparator.features(&pair.0, &pair.1);
                candidates.push(Candidate { pair, features });
            }
        }

        info!("Sampled {} candidate pairs", candidates.len());
        self.candidates = candidates;
        Ok(self.candidates.len())
    }

    /// Seed the engine with previously labeled examples.
    pub fn read_training(&mut self, training: TrainingData) -> Result<()> {
        info!(
            "Loaded {} match and {} distinct examples",
            training.matches.len(),
            training.distinct.len()
        );
        self.training.extend(training);

        let training = &self.training;
        self.candidates.retain(|c| !contains_pair(training, &c.pair));
        self.refresh_model()
    }

    /// Remove and return the candidate the current model is least sure about.
    ///
    /// Before both classes are labeled, the mean field similarity stands in
    /// for the model's probability.
    pub fn uncertain_pair(&mut self) -> Option<RecordPair> {
        let model = self.active_model.as_ref();
        let (idx, _) = self
            .candidates
            .iter()
            .enumerate()
            .map(|(idx, c)| {
                let p = match model {
                    Some(m) => m.predict(&c.features),
                    None => mean(&c.features),
                };
                (idx, OrderedFloat((p - 0.5).abs()))
            })
            .min_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)))?;

        Some(self.candidates.remove(idx).pair)
    }

    /// Record a label for a pair and update the active model.
    pub fn mark_pair(&mut self, pair: RecordPair, label: Label) -> Result<()> {
        self.training.add(pair, label);
        self.refresh_model()
    }

    /// Train on the accumulated examples and learn blocking predicates.
    pub fn train(&mut self) -> Result<&LearnedSettings> {
        let examples = self.examples();
        let classifier = Classifier::fit(&examples, self.options.train)?;
        let predicates = learn_predicates(
            self.comparator.schema(),
            &self.training,
            self.options.max_predicates,
        );

        info!(
            "Trained on {} examples with {} blocking predicates",
            examples.len(),
            predicates.len()
        );
        debug!("Classifier weights {:?}, bias {:.4}", classifier.weights(), classifier.bias());

        let settings = self.settings.insert(LearnedSettings {
            schema: self.comparator.schema().clone(),
            classifier,
            predicates,
        });
        Ok(&*settings)
    }

    fn refresh_model(&mut self) -> Result<()> {
        if self.training.is_trainable() {
            self.active_model = Some(Classifier::fit(&self.examples(), self.options.train)?);
        }
        Ok(())
    }

    fn examples(&self) -> Vec<Example> {
        let to_example = |(a, b): &RecordPair, is_match| Example {
            features: self.comparator.features(a, b),
            is_match,
        };
        self.training
            .matches
            .iter()
            .map(|p| to_example(p, true))
            .chain(self.training.distinct.iter().map(|p| to_example(p, false)))
            .collect()
    }

    fn is_labeled(&self, pair: &RecordPair) -> bool {
        contains_pair(&self.training, pair)
    }
}

impl Matcher for Dedupe {
    fn learned_settings(&self) -> Result<&LearnedSettings> {
        self.settings.as_ref().ok_or(Error::NotTrained)
    }
}

/// Inference-only engine over persisted settings
#[derive(Debug, Clone)]
pub struct StaticDedupe {
    settings: LearnedSettings,
}

impl StaticDedupe {
    pub fn new(settings: LearnedSettings) -> Result<Self> {
        settings.schema.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &LearnedSettings {
        &self.settings
    }
}

impl Matcher for StaticDedupe {
    fn learned_settings(&self) -> Result<&LearnedSettings> {
        Ok(&self.settings)
    }
}

fn contains_pair(training: &TrainingData, pair: &RecordPair) -> bool {
    let same = |other: &RecordPair| {
        (other.0 == pair.0 && other.1 == pair.1) || (other.0 == pair.1 && other.1 == pair.0)
    };
    training.matches.iter().chain(&training.distinct).any(same)
}

fn mean(values: &[f32]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
    }
}
