//! Whole-string text featurizer.
//!
//! Treats each code as a small text document: the code is normalized
//! (lowercased), split into word unigrams on Unicode word boundaries and into
//! character n-grams over the marked text. Both blocks are counted against
//! vocabularies fitted on the training codes, concatenated into one feature
//! block and L2-normalized.

use std::sync::Arc;

use crate::analysis::analyzer::{Analyzer, CharNgramAnalyzer, PipelineAnalyzer};
use crate::analysis::token_filter::LowercaseFilter;
use crate::analysis::tokenizer::{NgramTokenizer, UnicodeWordTokenizer};
use crate::data::Record;
use crate::error::Result;
use crate::feature::pipeline::{FeatureConfig, FeaturePipeline, FittedPipeline, PipelineKind};
use crate::feature::tfidf::{TfIdfVectorizer, Weighting};
use crate::feature::FeatureVector;

/// Generic text featurizer over the whole code.
#[derive(Clone, Debug)]
pub struct WholeStringFeaturizer {
    config: FeatureConfig,
}

impl WholeStringFeaturizer {
    /// Create a featurizer from settings.
    pub fn new(config: FeatureConfig) -> Self {
        WholeStringFeaturizer { config }
    }

    fn word_analyzer(&self) -> Arc<dyn Analyzer> {
        let mut analyzer = PipelineAnalyzer::new(Arc::new(UnicodeWordTokenizer::new()))
            .with_name("whole_string_words");
        if self.config.lowercase {
            analyzer = analyzer.add_filter(Arc::new(LowercaseFilter::new()));
        }
        Arc::new(analyzer)
    }

    fn char_analyzer(&self) -> Result<Arc<dyn Analyzer>> {
        let ngrams = NgramTokenizer::new(self.config.char_ngram_length)?;
        Ok(Arc::new(
            CharNgramAnalyzer::new(ngrams)
                .with_markers()
                .with_lowercase(self.config.lowercase),
        ))
    }
}

impl FeaturePipeline for WholeStringFeaturizer {
    fn kind(&self) -> PipelineKind {
        PipelineKind::WholeString
    }

    fn fit(&self, records: &[Record]) -> Result<Box<dyn FittedPipeline>> {
        let codes = || records.iter().map(|r| r.code.as_str());

        let words = if self.config.word_ngrams {
            let mut vectorizer = TfIdfVectorizer::with_weighting(self.word_analyzer(), Weighting::Tf);
            vectorizer.fit(codes())?;
            Some(vectorizer)
        } else {
            None
        };

        let mut chars = TfIdfVectorizer::with_weighting(self.char_analyzer()?, Weighting::Tf);
        chars.fit(codes())?;

        log::info!(
            "Text featurizer vocabulary: {} words, {} char grams",
            words.as_ref().map_or(0, TfIdfVectorizer::vocabulary_size),
            chars.vocabulary_size()
        );

        Ok(Box::new(FittedWholeString { words, chars }))
    }
}

/// A fitted [`WholeStringFeaturizer`].
#[derive(Debug)]
pub struct FittedWholeString {
    words: Option<TfIdfVectorizer>,
    chars: TfIdfVectorizer,
}

impl FittedPipeline for FittedWholeString {
    fn kind(&self) -> PipelineKind {
        PipelineKind::WholeString
    }

    fn transform(&self, code: &str) -> Result<FeatureVector> {
        let char_block = self.chars.transform(code)?;
        let mut features = match &self.words {
            Some(words) => words.transform(code)?.concat(&char_block),
            None => char_block,
        };
        features.l2_normalize();
        Ok(features)
    }

    fn dimension(&self) -> usize {
        self.words.as_ref().map_or(0, TfIdfVectorizer::vocabulary_size)
            + self.chars.vocabulary_size()
    }
}
