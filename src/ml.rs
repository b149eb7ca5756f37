//! Training, prediction and evaluation.
//!
//! - [`classifier`] - the multiclass linear classifier and its seeded trainer
//! - [`trainer`] - fits a feature pipeline and a classifier into a [`Model`]
//! - [`predictor`] - scores single records against a [`Model`]
//! - [`evaluator`] - accuracy over a held-out set with sampled logging

pub mod classifier;
pub mod evaluator;
pub mod model;
pub mod predictor;
pub mod trainer;

pub use classifier::{LinearClassifier, LinearTrainer, TrainerOptions};
pub use evaluator::{EvaluationReport, Evaluator, MalformedRowPolicy, SamplingPolicy};
pub use model::Model;
pub use predictor::{Prediction, Predictor};
pub use trainer::{Trainer, TrainingSummary};
