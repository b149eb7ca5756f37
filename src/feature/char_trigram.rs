//! Character trigram featurizer.
//!
//! Splits each code into characters, extracts every contiguous length-n
//! window (n = 3 by default) and weights the resulting bag of grams by
//! TF-IDF over the training corpus. A non-empty code shorter than n yields a
//! single partial window holding the whole code. Vectors are L2-normalized.

use std::sync::Arc;

use crate::analysis::analyzer::CharNgramAnalyzer;
use crate::analysis::tokenizer::NgramTokenizer;
use crate::data::Record;
use crate::error::Result;
use crate::feature::pipeline::{FeatureConfig, FeaturePipeline, FittedPipeline, PipelineKind};
use crate::feature::tfidf::{TfIdfVectorizer, Weighting};
use crate::feature::FeatureVector;

/// Bag-of-trigrams featurizer with TF-IDF weighting.
#[derive(Clone, Debug)]
pub struct CharTrigramFeaturizer {
    config: FeatureConfig,
}

impl CharTrigramFeaturizer {
    /// Create a featurizer from settings.
    pub fn new(config: FeatureConfig) -> Self {
        CharTrigramFeaturizer { config }
    }

    fn analyzer(&self) -> Result<CharNgramAnalyzer> {
        let ngrams = NgramTokenizer::new(self.config.char_ngram_length)?;
        Ok(CharNgramAnalyzer::new(ngrams))
    }
}

impl FeaturePipeline for CharTrigramFeaturizer {
    fn kind(&self) -> PipelineKind {
        PipelineKind::CharTrigram
    }

    fn fit(&self, records: &[Record]) -> Result<Box<dyn FittedPipeline>> {
        let mut vectorizer =
            TfIdfVectorizer::with_weighting(Arc::new(self.analyzer()?), Weighting::TfIdf);
        vectorizer.fit(records.iter().map(|r| r.code.as_str()))?;

        log::info!(
            "Char {}-gram vocabulary: {} grams",
            self.config.char_ngram_length,
            vectorizer.vocabulary_size()
        );

        Ok(Box::new(FittedCharTrigram { vectorizer }))
    }
}

/// A fitted [`CharTrigramFeaturizer`].
#[derive(Debug)]
pub struct FittedCharTrigram {
    vectorizer: TfIdfVectorizer,
}

impl FittedPipeline for FittedCharTrigram {
    fn kind(&self) -> PipelineKind {
        PipelineKind::CharTrigram
    }

    fn transform(&self, code: &str) -> Result<FeatureVector> {
        let mut features = self.vectorizer.transform(code)?;
        features.l2_normalize();
        Ok(features)
    }

    fn dimension(&self) -> usize {
        self.vectorizer.vocabulary_size()
    }
}
