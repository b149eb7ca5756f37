//! Character n-gram analyzer.

use crate::analysis::analyzer::Analyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::tokenizer::character::CharacterTokenizer;
use crate::analysis::tokenizer::ngram::NgramTokenizer;
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// Splits text into characters and emits contiguous n-grams over them.
///
/// With markers, `"737"` becomes `\u{2}73`, `737`, `37\u{3}` so a gram at
/// the start or end of a code is distinguishable from the same gram inside
/// it. Lowercasing is applied to the text before the split.
#[derive(Clone, Debug)]
pub struct CharNgramAnalyzer {
    characters: CharacterTokenizer,
    ngrams: NgramTokenizer,
    lowercase: bool,
}

impl CharNgramAnalyzer {
    /// Create an analyzer over plain characters.
    pub fn new(ngrams: NgramTokenizer) -> Self {
        CharNgramAnalyzer {
            characters: CharacterTokenizer::new(),
            ngrams,
            lowercase: false,
        }
    }

    /// Wrap the text in start/end markers before extracting n-grams.
    pub fn with_markers(mut self) -> Self {
        self.characters = CharacterTokenizer::with_markers();
        self
    }

    /// Lowercase the text before extracting n-grams.
    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }
}

impl Analyzer for CharNgramAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let normalized = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let marked: String = self.characters.chars(&normalized).into_iter().collect();
        self.ngrams.tokenize(&marked)
    }

    fn name(&self) -> &str {
        "char_ngram"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_trigrams() {
        let analyzer = CharNgramAnalyzer::new(NgramTokenizer::trigram());
        assert_eq!(analyzer.terms("B737").unwrap(), vec!["B73", "737"]);
    }

    #[test]
    fn test_marked_lowercase_trigrams() {
        let analyzer = CharNgramAnalyzer::new(NgramTokenizer::trigram())
            .with_markers()
            .with_lowercase(true);
        assert_eq!(
            analyzer.terms("E90").unwrap(),
            vec!["\u{2}e9", "e90", "90\u{3}"]
        );
    }
}
