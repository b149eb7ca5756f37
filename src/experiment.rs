//! The experiment driver: trains every configured variant on the same
//! training file, evaluates each on the same held-out file and reports the
//! accuracies side by side.
//!
//! # Examples
//!
//! ```
//! use flightcode::data::Record;
//! use flightcode::experiment::{Experiment, ExperimentConfig};
//! use flightcode::report::MemorySink;
//!
//! let training = vec![
//!     Record::new("AA100", "B737"),
//!     Record::new("AA200", "A320"),
//!     Record::new("AA300", "B737"),
//! ];
//! let evaluation = vec![Record::new("AA150", "B737")];
//!
//! let report = Experiment::run_records(
//!     &ExperimentConfig::default(),
//!     &training,
//!     &evaluation,
//!     &mut MemorySink::new(),
//! )
//! .unwrap();
//! assert_eq!(report.results.len(), 2);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::{CsvDataSource, Record};
use crate::error::{FlightCodeError, Result};
use crate::feature::{FeatureConfig, PipelineKind};
use crate::ml::classifier::TrainerOptions;
use crate::ml::evaluator::{EvaluationReport, Evaluator, MalformedRowPolicy, SamplingPolicy};
use crate::ml::model::Model;
use crate::ml::trainer::{Trainer, TrainingSummary};
use crate::report::ReportSink;

/// Default location of the training data.
pub const DEFAULT_TRAINING_PATH: &str = "TrainingData/FlightCodes.csv";

/// Default location of the evaluation data.
pub const DEFAULT_EVALUATION_PATH: &str = "TrainingData/MoreFlightCodes.csv";

/// Everything an experiment run needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// CSV file the models are trained on
    pub training_path: PathBuf,
    /// CSV file the models are evaluated on
    pub evaluation_path: PathBuf,
    /// Variants to run, in order
    pub variants: Vec<PipelineKind>,
    pub features: FeatureConfig,
    pub trainer: TrainerOptions,
    pub sampling: SamplingPolicy,
    pub malformed_rows: MalformedRowPolicy,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            training_path: PathBuf::from(DEFAULT_TRAINING_PATH),
            evaluation_path: PathBuf::from(DEFAULT_EVALUATION_PATH),
            variants: PipelineKind::ALL.to_vec(),
            features: FeatureConfig::default(),
            trainer: TrainerOptions::default(),
            sampling: SamplingPolicy::default(),
            malformed_rows: MalformedRowPolicy::default(),
        }
    }
}

impl ExperimentConfig {
    /// Load and validate a JSON config. Missing keys take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: ExperimentConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the whole config.
    pub fn validate(&self) -> Result<()> {
        if self.variants.is_empty() {
            return Err(FlightCodeError::invalid_config("no variants selected"));
        }
        for (i, variant) in self.variants.iter().enumerate() {
            if self.variants[..i].contains(variant) {
                return Err(FlightCodeError::invalid_config(format!(
                    "variant {variant} listed twice"
                )));
            }
        }
        self.features.validate()?;
        self.trainer.validate()?;
        Ok(())
    }
}

/// Training and evaluation results of one variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariantResult {
    pub training: TrainingSummary,
    pub evaluation: EvaluationReport,
}

/// Results of every variant, in run order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub results: Vec<VariantResult>,
}

impl ExperimentReport {
    /// Accuracy of `variant`, if it ran.
    pub fn accuracy(&self, variant: PipelineKind) -> Option<f64> {
        self.results
            .iter()
            .find(|r| r.evaluation.variant == variant)
            .map(|r| r.evaluation.accuracy())
    }

    /// The most accurate variant. Ties go to the one that ran first.
    pub fn best(&self) -> Option<&VariantResult> {
        self.results.iter().fold(None, |best, result| match best {
            Some(top) if top.evaluation.accuracy() >= result.evaluation.accuracy() => Some(top),
            _ => Some(result),
        })
    }

    /// One-line summary such as `WholeString: 0.8125, CharTrigram: 0.9375`.
    pub fn headline(&self) -> String {
        self.results
            .iter()
            .map(|r| format!("{}: {:.4}", r.evaluation.variant, r.evaluation.accuracy()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Runs experiments.
#[derive(Clone, Copy, Debug)]
pub struct Experiment;

impl Experiment {
    /// Run the experiment described by `config` on its CSV files.
    ///
    /// The training file is read strictly. The evaluation file is streamed
    /// once per variant and malformed rows follow `config.malformed_rows`.
    pub fn run(config: &ExperimentConfig, sink: &mut dyn ReportSink) -> Result<ExperimentReport> {
        config.validate()?;
        let source = CsvDataSource::new();

        log::info!("Loading training data from {}", config.training_path.display());
        let training = source.load(&config.training_path)?;
        log::info!("Loaded {} training records", training.len());

        Self::run_with(config, &training, || source.rows(&config.evaluation_path), sink)
    }

    /// Run the experiment on in-memory records. The paths in `config` are
    /// ignored.
    pub fn run_records(
        config: &ExperimentConfig,
        training: &[Record],
        evaluation: &[Record],
        sink: &mut dyn ReportSink,
    ) -> Result<ExperimentReport> {
        config.validate()?;
        Self::run_with(
            config,
            training,
            || Ok(evaluation.iter().cloned().map(Ok)),
            sink,
        )
    }

    fn run_with<F, I>(
        config: &ExperimentConfig,
        training: &[Record],
        mut evaluation_rows: F,
        sink: &mut dyn ReportSink,
    ) -> Result<ExperimentReport>
    where
        F: FnMut() -> Result<I>,
        I: IntoIterator<Item = Result<Record>>,
    {
        let mut models: Vec<Model> = Vec::with_capacity(config.variants.len());
        for &variant in &config.variants {
            sink.training_started(variant)?;
            let model = Trainer::new(variant)
                .with_features(config.features.clone())
                .with_options(config.trainer.clone())
                .train(training)?;
            sink.training_finished(model.summary())?;
            models.push(model);
        }

        let evaluator = Evaluator::new()
            .with_sampling(config.sampling.clone())
            .with_malformed_rows(config.malformed_rows);

        let mut results = Vec::with_capacity(models.len());
        for model in &models {
            let evaluation = evaluator.evaluate_rows(model, evaluation_rows()?, sink)?;
            results.push(VariantResult {
                training: model.summary().clone(),
                evaluation,
            });
        }

        let report = ExperimentReport { results };
        log::info!("{}", report.headline());
        sink.comparison(&report)?;

        Ok(report)
    }
}
