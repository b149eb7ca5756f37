//! Tokenizer implementations for text analysis.
//!
//! Tokenizers are the first step of feature extraction, responsible for
//! splitting a flight code into tokens.
//!
//! # Available Tokenizers
//!
//! - [`character::CharacterTokenizer`] - One token per character, optional markers
//! - [`ngram::NgramTokenizer`] - Contiguous character n-grams
//! - [`unicode_word::UnicodeWordTokenizer`] - Unicode word boundaries (UAX #29)
//!
//! # Examples
//!
//! ```
//! use flightcode::analysis::tokenizer::Tokenizer;
//! use flightcode::analysis::tokenizer::ngram::NgramTokenizer;
//!
//! let tokenizer = NgramTokenizer::trigram();
//! let tokens: Vec<_> = tokenizer.tokenize("B737").unwrap().map(|t| t.text).collect();
//! assert_eq!(tokens, vec!["B73", "737"]);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so fitted pipelines holding a tokenizer
/// can be shared between threads.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod character;
pub mod ngram;
pub mod unicode_word;

pub use character::CharacterTokenizer;
pub use ngram::NgramTokenizer;
pub use unicode_word::UnicodeWordTokenizer;
