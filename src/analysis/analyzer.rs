//! Analyzers that combine tokenizers and filters.
//!
//! ```text
//! Flight code → Analyzer → Token Stream → Vectorizer
//!                 ↓
//!             Tokenizer
//!                 ↓
//!             Filter 1..N
//! ```
//!
//! # Available Implementations
//!
//! - [`PipelineAnalyzer`] - A tokenizer followed by a chain of filters
//! - [`CharNgramAnalyzer`] - Character n-grams, optionally over marked text
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use flightcode::analysis::analyzer::{Analyzer, PipelineAnalyzer};
//! use flightcode::analysis::token_filter::LowercaseFilter;
//! use flightcode::analysis::tokenizer::UnicodeWordTokenizer;
//!
//! let analyzer = PipelineAnalyzer::new(Arc::new(UnicodeWordTokenizer::new()))
//!     .add_filter(Arc::new(LowercaseFilter::new()));
//! let words: Vec<_> = analyzer.analyze("B737-800").unwrap().map(|t| t.text).collect();
//! assert_eq!(words, vec!["b737", "800"]);
//! ```

mod char_ngram;
mod pipeline;

pub use char_ngram::CharNgramAnalyzer;
pub use pipeline::PipelineAnalyzer;

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// The trait requires `Send + Sync` so a fitted model can be shared across
/// threads for read-only prediction.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &str;

    /// Collect the token texts produced for `text`.
    fn terms(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyze(text)?.map(|token| token.text).collect())
    }
}
