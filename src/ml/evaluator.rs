//! Accuracy of a [`Model`] over a held-out set.
//!
//! Every record is predicted and compared to its expected label by exact,
//! case-sensitive string equality. While counting, the evaluator hands a
//! sample of predictions to the [`ReportSink`]: each `correct_every`-th
//! correct prediction and each `incorrect_every`-th incorrect one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::Record;
use crate::error::{FlightCodeError, Result};
use crate::feature::PipelineKind;
use crate::ml::model::Model;
use crate::ml::predictor::Predictor;
use crate::report::ReportSink;

/// How often predictions are sampled for display. A cadence of 0 disables
/// that stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingPolicy {
    /// Sample every n-th correct prediction
    pub correct_every: usize,
    /// Sample every n-th incorrect prediction
    pub incorrect_every: usize,
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        SamplingPolicy {
            correct_every: 300,
            incorrect_every: 30,
        }
    }
}

impl SamplingPolicy {
    /// Never sample.
    pub fn disabled() -> Self {
        SamplingPolicy {
            correct_every: 0,
            incorrect_every: 0,
        }
    }

    fn hits(every: usize, count: usize) -> bool {
        every != 0 && count % every == 0
    }
}

/// What to do with a row that cannot be parsed during evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedRowPolicy {
    /// Count the row as incorrect and keep going
    #[default]
    Skip,
    /// Abort the evaluation
    Fail,
}

impl FromStr for MalformedRowPolicy {
    type Err = FlightCodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(MalformedRowPolicy::Skip),
            "fail" => Ok(MalformedRowPolicy::Fail),
            other => Err(FlightCodeError::invalid_config(format!(
                "unknown malformed row policy '{other}'"
            ))),
        }
    }
}

/// Whether a prediction matched its expected label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Correct => f.write_str("correct"),
            Outcome::Incorrect => f.write_str("incorrect"),
        }
    }
}

/// A prediction picked out for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampledPrediction {
    /// Variant that produced the prediction
    pub variant: PipelineKind,
    /// Input flight code
    pub code: String,
    /// Label from the evaluation set
    pub expected: String,
    /// Predicted label
    pub predicted: String,
    /// Highest class score
    pub confidence: f32,
    pub outcome: Outcome,
    /// Running count of predictions with this outcome when the sample was
    /// taken; skipped malformed rows are not predictions and never advance it
    pub count: usize,
}

/// Counters of one evaluation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Variant that was evaluated
    pub variant: PipelineKind,
    pub correct: usize,
    pub incorrect: usize,
    /// Rows whose expected label never occurred in training (counted incorrect)
    pub unknown_labels: usize,
    /// Rows that could not be parsed (counted incorrect)
    pub malformed_rows: usize,
}

impl EvaluationReport {
    fn new(variant: PipelineKind) -> Self {
        EvaluationReport {
            variant,
            correct: 0,
            incorrect: 0,
            unknown_labels: 0,
            malformed_rows: 0,
        }
    }

    /// Number of rows evaluated.
    pub fn total(&self) -> usize {
        self.correct + self.incorrect
    }

    /// `correct / total`, in `[0, 1]`. NaN for a report with no rows, which
    /// [`Evaluator`] never returns.
    pub fn accuracy(&self) -> f64 {
        if self.total() == 0 {
            return f64::NAN;
        }
        self.correct as f64 / self.total() as f64
    }
}

/// Scores a model against labelled records.
#[derive(Clone, Debug, Default)]
pub struct Evaluator {
    sampling: SamplingPolicy,
    malformed_rows: MalformedRowPolicy,
}

impl Evaluator {
    /// Create an evaluator with default sampling that skips malformed rows.
    pub fn new() -> Self {
        Evaluator::default()
    }

    /// Use this sampling cadence.
    pub fn with_sampling(mut self, sampling: SamplingPolicy) -> Self {
        self.sampling = sampling;
        self
    }

    /// Use this malformed row policy.
    pub fn with_malformed_rows(mut self, policy: MalformedRowPolicy) -> Self {
        self.malformed_rows = policy;
        self
    }

    /// Evaluate `model` on in-memory records.
    pub fn evaluate(
        &self,
        model: &Model,
        records: &[Record],
        sink: &mut dyn ReportSink,
    ) -> Result<EvaluationReport> {
        self.evaluate_rows(model, records.iter().cloned().map(Ok), sink)
    }

    /// Evaluate `model` on a stream of rows such as [`crate::data::RecordRows`].
    ///
    /// # Errors
    ///
    /// `DegenerateDataset` when no row was evaluated. Row-level errors are
    /// counted or returned depending on the [`MalformedRowPolicy`]; any other
    /// error aborts the run.
    pub fn evaluate_rows<I>(
        &self,
        model: &Model,
        rows: I,
        sink: &mut dyn ReportSink,
    ) -> Result<EvaluationReport>
    where
        I: IntoIterator<Item = Result<Record>>,
    {
        let variant = model.kind();
        let predictor = Predictor::new(model);
        let mut report = EvaluationReport::new(variant);
        let mut mismatches = 0;

        log::info!("Evaluating {variant}");
        sink.evaluation_started(variant)?;

        for row in rows {
            let record = match row {
                Ok(record) => record,
                Err(e) if e.is_row_level() && self.malformed_rows == MalformedRowPolicy::Skip => {
                    log::warn!("Skipping malformed row: {e}");
                    report.malformed_rows += 1;
                    report.incorrect += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            if !model.labels().contains(&record.label) {
                log::debug!("Label '{}' was not seen in training", record.label);
                report.unknown_labels += 1;
            }

            let prediction = predictor.predict(&record)?;
            let (outcome, count, every) = if prediction.label == record.label {
                report.correct += 1;
                (Outcome::Correct, report.correct, self.sampling.correct_every)
            } else {
                report.incorrect += 1;
                mismatches += 1;
                (Outcome::Incorrect, mismatches, self.sampling.incorrect_every)
            };

            if SamplingPolicy::hits(every, count) {
                sink.sample(&SampledPrediction {
                    variant,
                    confidence: prediction.confidence(),
                    code: record.code,
                    expected: record.label,
                    predicted: prediction.label,
                    outcome,
                    count,
                })?;
            }
        }

        if report.total() == 0 {
            return Err(FlightCodeError::degenerate(format!(
                "no evaluation records for {variant}"
            )));
        }

        log::info!(
            "{} accuracy: {:.4} ({} correct, {} incorrect)",
            variant,
            report.accuracy(),
            report.correct,
            report.incorrect
        );
        sink.evaluation_finished(&report)?;

        Ok(report)
    }
}
