//! Character n-gram tokenizer implementation.

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::{FlightCodeError, Result};

/// How a text shorter than the n-gram length is handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EdgePolicy {
    /// Emit the whole text as a single partial window.
    #[default]
    PartialWindow,
    /// Emit nothing.
    Drop,
}

/// A tokenizer that generates contiguous character n-grams of one length.
///
/// Short structured codes such as `B737-800` carry discriminative substrings
/// (`B73`, `737`, `800`) that a trigram profile captures well.
///
/// # Examples
///
/// ```
/// use flightcode::analysis::tokenizer::ngram::NgramTokenizer;
/// use flightcode::analysis::tokenizer::Tokenizer;
///
/// let tokenizer = NgramTokenizer::trigram();
/// let tokens: Vec<_> = tokenizer.tokenize("A320").unwrap()
///     .map(|t| t.text)
///     .collect();
/// assert_eq!(tokens, vec!["A32", "320"]);
///
/// // Codes shorter than the window become a single partial window
/// let tokens: Vec<_> = tokenizer.tokenize("AB").unwrap()
///     .map(|t| t.text)
///     .collect();
/// assert_eq!(tokens, vec!["AB"]);
/// ```
#[derive(Clone, Debug)]
pub struct NgramTokenizer {
    /// N-gram length in characters
    gram: usize,
    /// Policy for texts shorter than `gram`
    edge_policy: EdgePolicy,
}

impl NgramTokenizer {
    /// Create a new n-gram tokenizer.
    ///
    /// # Errors
    ///
    /// Returns an error if `gram` is 0.
    pub fn new(gram: usize) -> Result<Self> {
        if gram == 0 {
            return Err(FlightCodeError::analysis("n-gram length must be at least 1"));
        }
        Ok(Self {
            gram,
            edge_policy: EdgePolicy::default(),
        })
    }

    /// Create a trigram tokenizer (n=3).
    pub fn trigram() -> Self {
        Self {
            gram: 3,
            edge_policy: EdgePolicy::default(),
        }
    }

    /// Set the policy for texts shorter than the n-gram length.
    pub fn with_edge_policy(mut self, edge_policy: EdgePolicy) -> Self {
        self.edge_policy = edge_policy;
        self
    }

    /// The configured n-gram length.
    pub fn gram(&self) -> usize {
        self.gram
    }
}

impl Tokenizer for NgramTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let chars: Vec<char> = text.chars().collect();

        if chars.is_empty() {
            return Ok(Box::new(std::iter::empty()));
        }

        if chars.len() < self.gram {
            return match self.edge_policy {
                EdgePolicy::PartialWindow => {
                    let token = Token::with_offsets(text, 0, 0, text.len());
                    Ok(Box::new(std::iter::once(token)))
                }
                EdgePolicy::Drop => Ok(Box::new(std::iter::empty())),
            };
        }

        // Byte offset of every char boundary, including the end of the text
        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        boundaries.push(text.len());

        let tokens: Vec<Token> = (0..=chars.len() - self.gram)
            .map(|start| {
                let end = start + self.gram;
                let ngram: String = chars[start..end].iter().collect();
                Token::with_offsets(ngram, start, boundaries[start], boundaries[end])
            })
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "ngram"
    }
}
