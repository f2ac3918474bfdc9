//! Pair classifier
//!
//! L2-regularized logistic regression over pair feature vectors, trained
//! with full-batch gradient descent. Classes are reweighted so a handful of
//! labeled matches is not drowned out by many labeled distinct pairs.
//! Training is deterministic: same examples, same weights.

use dedupx_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Gradient descent parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainOptions {
    pub learning_rate: f64,
    pub iterations: usize,
    pub l2: f64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            learning_rate: 1.0,
            iterations: 1000,
            l2: 0.01,
        }
    }
}

/// A labeled feature vector
#[derive(Debug, Clone)]
pub struct Example {
    pub features: Vec<f32>,
    pub is_match: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classifier {
    weights: Vec<f64>,
    bias: f64,
}

impl Classifier {
    /// Fit on labeled examples. Needs at least one example of each class.
    pub fn fit(examples: &[Example], options: TrainOptions) -> Result<Self> {
        let matches = examples.iter().filter(|e| e.is_match).count();
        let distinct = examples.len() - matches;
        if matches == 0 || distinct == 0 {
            return Err(Error::EmptyTraining { matches, distinct });
        }

        let dim = examples[0].features.len();
        if let Some(bad) = examples.iter().find(|e| e.features.len() != dim) {
            return Err(Error::InvalidConfig(format!(
                "feature length mismatch: expected {}, got {}",
                dim,
                bad.features.len()
            )));
        }

        let n = examples.len() as f64;
        let match_weight = n / (2.0 * matches as f64);
        let distinct_weight = n / (2.0 * distinct as f64);

        let mut model = Self {
            weights: vec![0.0; dim],
            bias: 0.0,
        };

        let mut grad_w = vec![0.0f64; dim];
        for _ in 0..options.iterations {
            grad_w.iter_mut().for_each(|g| *g = 0.0);
            let mut grad_b = 0.0f64;

            for example in examples {
                let (target, weight) = if example.is_match {
                    (1.0, match_weight)
                } else {
                    (0.0, distinct_weight)
                };
                let error = weight * (model.predict(&example.features) - target);
                for (g, &x) in grad_w.iter_mut().zip(&example.features) {
                    *g += error * x as f64;
                }
                grad_b += error;
            }

            for (w, g) in model.weights.iter_mut().zip(&grad_w) {
                *w -= options.learning_rate * (g / n + options.l2 * *w);
            }
            model.bias -= options.learning_rate * grad_b / n;
        }

        Ok(model)
    }

    /// Match probability for a feature vector
    #[inline]
    pub fn predict(&self, features: &[f32]) -> f64 {
        let z: f64 = self
            .weights
            .iter()
            .zip(features)
            .map(|(w, &x)| w * x as f64)
            .sum::<f64>()
            + self.bias;
        sigmoid(z)
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }
}

#[inline]
fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
