//! The feature pipeline capability shared by both featurizers.
//!
//! A [`FeaturePipeline`] is fitted once on the training records and yields a
//! [`FittedPipeline`], which turns any code into a [`FeatureVector`] with the
//! same layout it produced for the training set. The variant is chosen by
//! [`PipelineKind`], so the experiment swaps featurizers by configuration.
//!
//! # Examples
//!
//! ```
//! use flightcode::data::Record;
//! use flightcode::feature::{FeatureConfig, PipelineKind};
//!
//! let records = vec![Record::new("B737", "738"), Record::new("A320", "320")];
//! let pipeline = PipelineKind::CharTrigram.build(&FeatureConfig::default()).unwrap();
//! let fitted = pipeline.fit(&records).unwrap();
//!
//! let features = fitted.transform("B737").unwrap();
//! assert_eq!(features.dimension(), fitted.dimension());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::Record;
use crate::error::{FlightCodeError, Result};
use crate::feature::FeatureVector;
use crate::feature::char_trigram::CharTrigramFeaturizer;
use crate::feature::whole_string::WholeStringFeaturizer;

/// An unfitted feature pipeline.
pub trait FeaturePipeline: Send + Sync {
    /// Which variant this is.
    fn kind(&self) -> PipelineKind;

    /// Fit the pipeline on the training records.
    fn fit(&self, records: &[Record]) -> Result<Box<dyn FittedPipeline>>;
}

/// A fitted feature pipeline. Immutable and safe to share across threads.
pub trait FittedPipeline: Send + Sync + fmt::Debug {
    /// Which variant produced this pipeline.
    fn kind(&self) -> PipelineKind;

    /// Featurize a flight code.
    fn transform(&self, code: &str) -> Result<FeatureVector>;

    /// Length of every vector this pipeline produces.
    fn dimension(&self) -> usize;
}

/// The available featurizers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineKind {
    /// Generic text featurization of the whole code
    WholeString,
    /// Bag of TF-IDF weighted character trigrams
    CharTrigram,
}

impl PipelineKind {
    /// Both variants, in the order the experiment runs them.
    pub const ALL: [PipelineKind; 2] = [PipelineKind::WholeString, PipelineKind::CharTrigram];

    /// Build the pipeline for this variant.
    pub fn build(self, config: &FeatureConfig) -> Result<Box<dyn FeaturePipeline>> {
        config.validate()?;
        Ok(match self {
            PipelineKind::WholeString => Box::new(WholeStringFeaturizer::new(config.clone())),
            PipelineKind::CharTrigram => Box::new(CharTrigramFeaturizer::new(config.clone())),
        })
    }

    /// Human readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            PipelineKind::WholeString => "WholeString",
            PipelineKind::CharTrigram => "CharTrigram",
        }
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for PipelineKind {
    type Err = FlightCodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "whole-string" | "wholestring" | "text" => Ok(PipelineKind::WholeString),
            "char-trigram" | "chartrigram" | "trigram" => Ok(PipelineKind::CharTrigram),
            other => Err(FlightCodeError::invalid_config(format!(
                "unknown pipeline '{other}'"
            ))),
        }
    }
}

/// Featurizer settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Lowercase codes before whole-string featurization.
    pub lowercase: bool,
    /// Character n-gram length used by both featurizers.
    pub char_ngram_length: usize,
    /// Include word unigrams in whole-string featurization.
    pub word_ngrams: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        FeatureConfig {
            lowercase: true,
            char_ngram_length: 3,
            word_ngrams: true,
        }
    }
}

impl FeatureConfig {
    /// Check the settings.
    pub fn validate(&self) -> Result<()> {
        if self.char_ngram_length == 0 {
            return Err(FlightCodeError::invalid_config(
                "char_ngram_length must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<Record> {
        vec![
            Record::new("AA100", "B737"),
            Record::new("AA200", "A320"),
            Record::new("AA300", "B737"),
        ]
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("whole-string".parse::<PipelineKind>().unwrap(), PipelineKind::WholeString);
        assert_eq!("CharTrigram".parse::<PipelineKind>().unwrap(), PipelineKind::CharTrigram);
        assert!("bigram".parse::<PipelineKind>().is_err());
    }

    #[test]
    fn test_variants_are_interchangeable() {
        for kind in PipelineKind::ALL {
            let pipeline = kind.build(&FeatureConfig::default()).unwrap();
            assert_eq!(pipeline.kind(), kind);

            let fitted = pipeline.fit(&records()).unwrap();
            assert_eq!(fitted.kind(), kind);

            let features = fitted.transform("AA150").unwrap();
            assert_eq!(features.dimension(), fitted.dimension());
            assert!(features.nnz() > 0, "{kind} produced no features for AA150");
        }
    }

    #[test]
    fn test_invalid_config() {
        let config = FeatureConfig {
            char_ngram_length: 0,
            ..FeatureConfig::default()
        };
        assert!(PipelineKind::CharTrigram.build(&config).is_err());
    }

    #[test]
    fn test_kind_serde_names() {
        let json = serde_json::to_string(&PipelineKind::CharTrigram).unwrap();
        assert_eq!(json, "\"char-trigram\"");
    }
}
