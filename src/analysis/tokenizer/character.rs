//! Character tokenizer implementation.

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// Marker emitted before the first character when markers are enabled.
pub const START_MARKER: char = '\u{2}';

/// Marker emitted after the last character when markers are enabled.
pub const END_MARKER: char = '\u{3}';

/// A tokenizer that emits every character of the input as its own token.
///
/// With markers enabled the stream is wrapped in [`START_MARKER`] and
/// [`END_MARKER`] tokens so that n-grams built on top of it can tell a
/// prefix from an infix.
///
/// # Examples
///
/// ```
/// use flightcode::analysis::tokenizer::Tokenizer;
/// use flightcode::analysis::tokenizer::character::CharacterTokenizer;
///
/// let tokenizer = CharacterTokenizer::new();
/// let tokens: Vec<_> = tokenizer.tokenize("E90").unwrap().map(|t| t.text).collect();
/// assert_eq!(tokens, vec!["E", "9", "0"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CharacterTokenizer {
    use_markers: bool,
}

impl CharacterTokenizer {
    /// Create a character tokenizer without markers.
    pub fn new() -> Self {
        CharacterTokenizer { use_markers: false }
    }

    /// Create a character tokenizer that wraps the text in start/end markers.
    pub fn with_markers() -> Self {
        CharacterTokenizer { use_markers: true }
    }

    /// Split `text` into characters, applying markers if configured.
    pub fn chars(&self, text: &str) -> Vec<char> {
        let mut chars = Vec::with_capacity(text.len() + 2);
        if self.use_markers {
            chars.push(START_MARKER);
        }
        chars.extend(text.chars());
        if self.use_markers {
            chars.push(END_MARKER);
        }
        chars
    }
}

impl Tokenizer for CharacterTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        if text.is_empty() && !self.use_markers {
            return Ok(Box::new(std::iter::empty()));
        }

        let tokens: Vec<Token> = self
            .chars(text)
            .into_iter()
            .enumerate()
            .map(|(position, c)| Token::new(c.to_string(), position))
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "character"
    }
}
