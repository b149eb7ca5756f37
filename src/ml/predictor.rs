//! Single-record prediction.

use serde::{Deserialize, Serialize};

use crate::data::Record;
use crate::error::{FlightCodeError, Result};
use crate::feature::LabelKey;
use crate::ml::classifier::argmax;
use crate::ml::model::Model;

/// Predicted label with the score of every known class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Decoded label of the best class
    pub label: String,
    /// One probability per class, in label-key order
    pub scores: Vec<f32>,
}

impl Prediction {
    /// The highest score, or NaN when there are no scores.
    pub fn confidence(&self) -> f32 {
        self.scores
            .iter()
            .copied()
            .reduce(f32::max)
            .unwrap_or(f32::NAN)
    }
}

/// Applies a [`Model`] to records.
#[derive(Clone, Copy, Debug)]
pub struct Predictor<'a> {
    model: &'a Model,
}

impl<'a> Predictor<'a> {
    /// Create a predictor over `model`.
    pub fn new(model: &'a Model) -> Self {
        Predictor { model }
    }

    /// The model this predictor reads.
    pub fn model(&self) -> &'a Model {
        self.model
    }

    /// Predict the label of `record`. Only the code is read.
    pub fn predict(&self, record: &Record) -> Result<Prediction> {
        self.predict_code(&record.code)
    }

    /// Predict the label of a bare flight code.
    pub fn predict_code(&self, code: &str) -> Result<Prediction> {
        let features = self.model.featurize(code)?;
        let scores = self.model.classifier().scores(&features);
        let best = argmax(&scores)
            .ok_or_else(|| FlightCodeError::degenerate("model has no classes"))?;
        let label = self.model.labels().decode(best as LabelKey)?.to_string();

        Ok(Prediction { label, scores })
    }
}
