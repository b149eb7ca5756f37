//! Multiclass linear classifier.
//!
//! The model keeps one weight row and one bias per class and turns the
//! per-class linear scores into a probability distribution with softmax
//! (a maximum entropy model). [`LinearTrainer`] fits it with seeded
//! stochastic gradient steps on the cross-entropy loss with L2
//! regularization, so two runs with the same seed and data produce
//! identical weights.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{FlightCodeError, Result};
use crate::feature::{FeatureVector, LabelKey};

/// Below this weight scale the scale is folded back into the weights.
const MIN_WEIGHT_SCALE: f32 = 1e-6;

/// Hyperparameters of the linear trainer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerOptions {
    /// Passes over the training set.
    pub epochs: usize,
    /// Initial step size.
    pub learning_rate: f32,
    /// L2 regularization strength.
    pub l2: f32,
    /// Seed for the example shuffling order.
    pub seed: u64,
}

impl Default for TrainerOptions {
    fn default() -> Self {
        TrainerOptions {
            epochs: 30,
            learning_rate: 0.5,
            l2: 1e-6,
            seed: 0,
        }
    }
}

impl TrainerOptions {
    /// Check the hyperparameters.
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(FlightCodeError::invalid_config("epochs must be at least 1"));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(FlightCodeError::invalid_config(
                "learning_rate must be a positive number",
            ));
        }
        if !(self.l2.is_finite() && self.l2 >= 0.0) {
            return Err(FlightCodeError::invalid_config(
                "l2 must be a non-negative number",
            ));
        }
        Ok(())
    }
}

/// A featurized training example.
#[derive(Clone, Debug, PartialEq)]
pub struct Example {
    /// Input features
    pub features: FeatureVector,
    /// Encoded target class
    pub label: LabelKey,
}

/// Fitted multiclass linear classifier.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearClassifier {
    /// One row of `dimension` weights per class
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

impl LinearClassifier {
    /// Number of classes.
    pub fn num_classes(&self) -> usize {
        self.bias.len()
    }

    /// Expected feature dimension.
    pub fn dimension(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    /// Raw linear score of every class.
    pub fn logits(&self, features: &FeatureVector) -> Vec<f32> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| features.dot(row) + b)
            .collect()
    }

    /// Probability of every class; the scores sum to 1.
    pub fn scores(&self, features: &FeatureVector) -> Vec<f32> {
        let mut scores = self.logits(features);
        softmax(&mut scores);
        scores
    }
}

/// Index of the highest score. Ties go to the lowest index.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

fn softmax(values: &mut [f32]) {
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut sum = 0.0;
    for v in values.iter_mut() {
        *v = (*v - max).exp();
        sum += *v;
    }
    if sum > 0.0 {
        for v in values.iter_mut() {
            *v /= sum;
        }
    }
}

/// Outcome of a [`LinearTrainer::fit`] run.
#[derive(Clone, Debug)]
pub struct FitResult {
    /// The fitted classifier
    pub classifier: LinearClassifier,
    /// Mean cross-entropy loss of every epoch
    pub epoch_losses: Vec<f32>,
}

/// Seeded stochastic gradient trainer for [`LinearClassifier`].
#[derive(Clone, Debug, Default)]
pub struct LinearTrainer {
    options: TrainerOptions,
}

impl LinearTrainer {
    /// Create a trainer.
    pub fn new(options: TrainerOptions) -> Self {
        LinearTrainer { options }
    }

    /// Fit a classifier over `examples` with `num_classes` classes of
    /// `dimension`-wide feature vectors.
    ///
    /// # Errors
    ///
    /// `DegenerateDataset` when there are no examples or classes,
    /// `InvalidConfig` for bad options, `Analysis` when an example does not
    /// match `dimension` or `num_classes`.
    pub fn fit(&self, examples: &[Example], num_classes: usize, dimension: usize) -> Result<FitResult> {
        self.options.validate()?;
        if examples.is_empty() || num_classes == 0 {
            return Err(FlightCodeError::degenerate("no examples to fit"));
        }
        for example in examples {
            if example.features.dimension() != dimension {
                return Err(FlightCodeError::analysis(format!(
                    "feature dimension {} does not match {}",
                    example.features.dimension(),
                    dimension
                )));
            }
            if example.label as usize >= num_classes {
                return Err(FlightCodeError::analysis(format!(
                    "label key {} out of range for {} classes",
                    example.label, num_classes
                )));
            }
        }

        let TrainerOptions {
            epochs,
            learning_rate,
            l2,
            seed,
        } = self.options;

        // Effective weights are `scale * weights`, so L2 decay is O(1) per step
        let mut weights = vec![vec![0.0f32; dimension]; num_classes];
        let mut bias = vec![0.0f32; num_classes];
        let mut scale = 1.0f32;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut order: Vec<usize> = (0..examples.len()).collect();
        let mut epoch_losses = Vec::with_capacity(epochs);
        let mut probabilities = vec![0.0f32; num_classes];
        let mut step = 0u64;

        for epoch in 0..epochs {
            order.shuffle(&mut rng);
            let mut loss = 0.0f64;

            for &i in &order {
                let example = &examples[i];
                step += 1;
                let rate = learning_rate / (1.0 + learning_rate * l2 * step as f32);

                for (c, p) in probabilities.iter_mut().enumerate() {
                    *p = scale * example.features.dot(&weights[c]) + bias[c];
                }
                softmax(&mut probabilities);

                let target = example.label as usize;
                loss -= f64::from(probabilities[target].max(f32::MIN_POSITIVE)).ln();

                scale *= 1.0 - rate * l2;
                if scale < MIN_WEIGHT_SCALE {
                    fold_scale(&mut weights, &mut scale);
                }

                for (c, &p) in probabilities.iter().enumerate() {
                    let gradient = if c == target { p - 1.0 } else { p };
                    if gradient == 0.0 {
                        continue;
                    }
                    let row = &mut weights[c];
                    for (index, value) in example.features.iter() {
                        row[index] -= rate * gradient * value / scale;
                    }
                    bias[c] -= rate * gradient;
                }
            }

            let mean_loss = (loss / examples.len() as f64) as f32;
            log::debug!("epoch {}/{}: loss={:.5}", epoch + 1, epochs, mean_loss);
            epoch_losses.push(mean_loss);
        }

        fold_scale(&mut weights, &mut scale);

        Ok(FitResult {
            classifier: LinearClassifier { weights, bias },
            epoch_losses,
        })
    }
}

fn fold_scale(weights: &mut [Vec<f32>], scale: &mut f32) {
    if *scale == 1.0 {
        return;
    }
    for row in weights.iter_mut() {
        for w in row.iter_mut() {
            *w *= *scale;
        }
    }
    *scale = 1.0;
}
