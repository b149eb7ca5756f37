//! Reporting of training and evaluation progress.
//!
//! The experiment and the evaluator never print. They hand events to a
//! [`ReportSink`], and the caller decides where they go:
//!
//! - [`ConsoleSink`] - human readable tables, colored samples
//! - [`JsonSink`] - the final comparison as JSON
//! - [`MemorySink`] - keeps every event, for tests

mod console;
mod json;
mod memory;

pub use console::{ColorMode, ConsoleSink};
pub use json::JsonSink;
pub use memory::{MemorySink, ReportEvent};

use crate::error::Result;
use crate::experiment::ExperimentReport;
use crate::feature::PipelineKind;
use crate::ml::evaluator::{EvaluationReport, SampledPrediction};
use crate::ml::trainer::TrainingSummary;

/// Receiver of experiment events. Every method defaults to doing nothing.
pub trait ReportSink {
    fn training_started(&mut self, _variant: PipelineKind) -> Result<()> {
        Ok(())
    }

    fn training_finished(&mut self, _summary: &TrainingSummary) -> Result<()> {
        Ok(())
    }

    fn evaluation_started(&mut self, _variant: PipelineKind) -> Result<()> {
        Ok(())
    }

    /// A sampled prediction, in evaluation order.
    fn sample(&mut self, _sample: &SampledPrediction) -> Result<()> {
        Ok(())
    }

    fn evaluation_finished(&mut self, _report: &EvaluationReport) -> Result<()> {
        Ok(())
    }

    /// The side by side result of every variant.
    fn comparison(&mut self, _report: &ExperimentReport) -> Result<()> {
        Ok(())
    }
}
