//! # flightcode
//!
//! Classifies short flight codes into IATA aircraft type labels and compares
//! two featurization strategies on the same data.
//!
//! ## Features
//!
//! - Schema-driven CSV loading with streamed, per-row error reporting
//! - Whole-string text featurization (words plus marked character n-grams)
//! - Character trigram bags with TF-IDF weighting
//! - Seeded multiclass linear (softmax) classifier
//! - Accuracy evaluation with sampled prediction logging
//! - Pluggable report sinks: console tables, JSON, in-memory

pub mod analysis;
pub mod cli;
pub mod data;
pub mod error;
pub mod experiment;
pub mod feature;
pub mod ml;
pub mod report;

pub mod prelude {
    pub use crate::data::{CsvDataSource, Record};
    pub use crate::error::{FlightCodeError, Result};
    pub use crate::experiment::{Experiment, ExperimentConfig, ExperimentReport};
    pub use crate::feature::{FeatureConfig, PipelineKind};
    pub use crate::ml::{Evaluator, Model, Prediction, Predictor, Trainer};
    pub use crate::report::{ConsoleSink, MemorySink, ReportSink};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
