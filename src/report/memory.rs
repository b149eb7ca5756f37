use crate::error::Result;
use crate::experiment::ExperimentReport;
use crate::feature::PipelineKind;
use crate::ml::evaluator::{EvaluationReport, SampledPrediction};
use crate::ml::trainer::TrainingSummary;
use crate::report::ReportSink;

/// One event received by a [`MemorySink`].
#[derive(Clone, Debug, PartialEq)]
pub enum ReportEvent {
    TrainingStarted(PipelineKind),
    TrainingFinished(TrainingSummary),
    EvaluationStarted(PipelineKind),
    Sample(SampledPrediction),
    EvaluationFinished(EvaluationReport),
    Comparison(ExperimentReport),
}

/// Records every event in order.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    events: Vec<ReportEvent>,
}

impl MemorySink {
    pub fn new() -> Self {
        MemorySink::default()
    }

    /// All events received so far.
    pub fn events(&self) -> &[ReportEvent] {
        &self.events
    }

    /// Only the sampled predictions.
    pub fn samples(&self) -> Vec<&SampledPrediction> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ReportEvent::Sample(sample) => Some(sample),
                _ => None,
            })
            .collect()
    }
}

impl ReportSink for MemorySink {
    fn training_started(&mut self, variant: PipelineKind) -> Result<()> {
        self.events.push(ReportEvent::TrainingStarted(variant));
        Ok(())
    }

    fn training_finished(&mut self, summary: &TrainingSummary) -> Result<()> {
        self.events.push(ReportEvent::TrainingFinished(summary.clone()));
        Ok(())
    }

    fn evaluation_started(&mut self, variant: PipelineKind) -> Result<()> {
        self.events.push(ReportEvent::EvaluationStarted(variant));
        Ok(())
    }

    fn sample(&mut self, sample: &SampledPrediction) -> Result<()> {
        self.events.push(ReportEvent::Sample(sample.clone()));
        Ok(())
    }

    fn evaluation_finished(&mut self, report: &EvaluationReport) -> Result<()> {
        self.events.push(ReportEvent::EvaluationFinished(report.clone()));
        Ok(())
    }

    fn comparison(&mut self, report: &ExperimentReport) -> Result<()> {
        self.events.push(ReportEvent::Comparison(report.clone()));
        Ok(())
    }
}
