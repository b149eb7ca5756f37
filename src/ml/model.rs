//! A trained classifier bound to one pipeline variant.

use crate::error::Result;
use crate::feature::{FeatureVector, FittedPipeline, LabelEncoder, PipelineKind};
use crate::ml::classifier::LinearClassifier;
use crate::ml::trainer::TrainingSummary;

/// Fitted pipeline, classifier weights and label encoding.
///
/// Immutable once trained; share it freely between threads for read-only
/// prediction.
#[derive(Debug)]
pub struct Model {
    pipeline: Box<dyn FittedPipeline>,
    classifier: LinearClassifier,
    labels: LabelEncoder,
    summary: TrainingSummary,
}

impl Model {
    pub(crate) fn new(
        pipeline: Box<dyn FittedPipeline>,
        classifier: LinearClassifier,
        labels: LabelEncoder,
        summary: TrainingSummary,
    ) -> Self {
        Model {
            pipeline,
            classifier,
            labels,
            summary,
        }
    }

    /// The pipeline variant.
    pub fn kind(&self) -> PipelineKind {
        self.pipeline.kind()
    }

    /// Feature vector length.
    pub fn dimension(&self) -> usize {
        self.pipeline.dimension()
    }

    /// Label encoding fitted on the training set.
    pub fn labels(&self) -> &LabelEncoder {
        &self.labels
    }

    /// The linear classifier.
    pub fn classifier(&self) -> &LinearClassifier {
        &self.classifier
    }

    /// Statistics of the training run.
    pub fn summary(&self) -> &TrainingSummary {
        &self.summary
    }

    /// Featurize a code with the fitted pipeline.
    pub fn featurize(&self, code: &str) -> Result<FeatureVector> {
        self.pipeline.transform(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_model_is_send_sync() {
        assert_send_sync::<Model>();
    }
}
