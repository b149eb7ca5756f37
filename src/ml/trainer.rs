//! Fits a feature pipeline and a linear classifier into a [`Model`].

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::data::Record;
use crate::error::{FlightCodeError, Result};
use crate::feature::{FeatureConfig, LabelEncoder, PipelineKind};
use crate::ml::classifier::{Example, LinearTrainer, TrainerOptions};
use crate::ml::model::Model;

/// Training statistics kept with a fitted [`Model`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    /// Pipeline variant that was trained
    pub variant: PipelineKind,
    /// Number of training records
    pub records: usize,
    /// Number of distinct labels
    pub classes: usize,
    /// Feature vector length
    pub dimension: usize,
    /// Mean cross-entropy loss per epoch
    pub epoch_losses: Vec<f32>,
    /// Wall-clock time of featurization plus fitting
    pub elapsed: Duration,
}

impl TrainingSummary {
    /// Loss of the last epoch, if any epoch ran.
    pub fn final_loss(&self) -> Option<f32> {
        self.epoch_losses.last().copied()
    }

    /// Training time in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Trains one pipeline variant end to end.
#[derive(Clone, Debug)]
pub struct Trainer {
    kind: PipelineKind,
    features: FeatureConfig,
    options: TrainerOptions,
}

impl Trainer {
    /// Create a trainer for `kind` with default settings.
    pub fn new(kind: PipelineKind) -> Self {
        Trainer {
            kind,
            features: FeatureConfig::default(),
            options: TrainerOptions::default(),
        }
    }

    /// Use these featurizer settings.
    pub fn with_features(mut self, features: FeatureConfig) -> Self {
        self.features = features;
        self
    }

    /// Use these classifier hyperparameters.
    pub fn with_options(mut self, options: TrainerOptions) -> Self {
        self.options = options;
        self
    }

    /// The variant this trainer fits.
    pub fn kind(&self) -> PipelineKind {
        self.kind
    }

    /// The classifier hyperparameters.
    pub fn options(&self) -> &TrainerOptions {
        &self.options
    }

    /// Train a model on `records`.
    ///
    /// Labels are keyed in order of first occurrence. The returned model
    /// carries a [`TrainingSummary`] with the elapsed wall-clock time.
    pub fn train(&self, records: &[Record]) -> Result<Model> {
        if records.is_empty() {
            return Err(FlightCodeError::degenerate(format!(
                "no training records for {}",
                self.kind
            )));
        }
        self.options.validate()?;
        let pipeline = self.kind.build(&self.features)?;

        log::info!("Training {} on {} records", self.kind, records.len());
        let start = Instant::now();

        let labels = LabelEncoder::fit(records.iter().map(|r| r.label.as_str()));
        let fitted = pipeline.fit(records)?;

        let examples = records
            .iter()
            .map(|record| {
                Ok(Example {
                    features: fitted.transform(&record.code)?,
                    label: labels.encode(&record.label)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let dimension = fitted.dimension();
        let result = LinearTrainer::new(self.options.clone()).fit(&examples, labels.len(), dimension)?;
        let elapsed = start.elapsed();

        let summary = TrainingSummary {
            variant: self.kind,
            records: records.len(),
            classes: labels.len(),
            dimension,
            epoch_losses: result.epoch_losses,
            elapsed,
        };

        log::info!(
            "Trained {} in {:.3}s: {} classes, {} features, final loss {:.5}",
            self.kind,
            summary.elapsed_secs(),
            summary.classes,
            summary.dimension,
            summary.final_loss().unwrap_or(f32::NAN)
        );

        Ok(Model::new(fitted, result.classifier, labels, summary))
    }
}
