//! Term vectorizer with optional TF-IDF weighting.

use std::collections::BTreeMap;
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};

use crate::analysis::analyzer::Analyzer;
use crate::error::Result;
use crate::feature::FeatureVector;

/// How term counts are weighted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Weighting {
    /// Raw term counts.
    Tf,
    /// Term frequency (count / document length) times inverse document frequency.
    TfIdf,
}

/// Vectorizer that maps analyzed terms onto a vocabulary fitted on a corpus.
pub struct TfIdfVectorizer {
    /// Vocabulary: term -> index mapping, indices in first-seen order.
    vocabulary: AHashMap<String, usize>,
    /// Inverse document frequency for each term.
    idf: Vec<f32>,
    /// Total number of documents seen during fitting.
    n_documents: usize,
    /// Analyzer for tokenization.
    analyzer: Arc<dyn Analyzer>,
    weighting: Weighting,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("n_documents", &self.n_documents)
            .field("analyzer", &self.analyzer.name())
            .field("weighting", &self.weighting)
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create a vectorizer with the given analyzer and weighting scheme.
    pub fn with_weighting(analyzer: Arc<dyn Analyzer>, weighting: Weighting) -> Self {
        Self {
            vocabulary: AHashMap::new(),
            idf: Vec::new(),
            n_documents: 0,
            analyzer,
            weighting,
        }
    }

    /// Fit the vectorizer on training documents.
    ///
    /// Terms are indexed in the order they are first seen, so the same corpus
    /// always produces the same vocabulary layout.
    pub fn fit<I, S>(&mut self, documents: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocabulary: AHashMap<String, usize> = AHashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();
        let mut n_documents = 0;

        for doc in documents {
            n_documents += 1;
            let terms = self.analyzer.terms(doc.as_ref())?;
            let mut seen: AHashSet<usize> = AHashSet::new();

            for term in terms {
                let idx = match vocabulary.get(&term) {
                    Some(&idx) => idx,
                    None => {
                        let idx = vocabulary.len();
                        vocabulary.insert(term, idx);
                        document_frequency.push(0);
                        idx
                    }
                };
                if seen.insert(idx) {
                    document_frequency[idx] += 1;
                }
            }
        }

        // IDF = ln((N + 1) / (df + 1)) + 1
        let idf = document_frequency
            .iter()
            .map(|&df| (((n_documents as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0) as f32)
            .collect();

        self.vocabulary = vocabulary;
        self.idf = idf;
        self.n_documents = n_documents;

        log::debug!(
            "Fitted {} vectorizer: {} terms over {} documents",
            self.analyzer.name(),
            self.vocabulary.len(),
            self.n_documents
        );

        Ok(())
    }

    /// Transform a document into a feature vector over the fitted vocabulary.
    ///
    /// Terms outside the vocabulary are ignored.
    pub fn transform(&self, document: &str) -> Result<FeatureVector> {
        let terms = self.analyzer.terms(document)?;
        let doc_length = terms.len() as f32;
        let mut counts: BTreeMap<usize, f32> = BTreeMap::new();

        for term in &terms {
            if let Some(&idx) = self.vocabulary.get(term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        if self.weighting == Weighting::TfIdf && doc_length > 0.0 {
            for (idx, count) in counts.iter_mut() {
                *count = *count / doc_length * self.idf[*idx];
            }
        }

        Ok(FeatureVector::from_entries(self.vocabulary.len(), counts))
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Index of `term` in the vocabulary.
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Inverse document frequency of `term`.
    pub fn idf(&self, term: &str) -> Option<f32> {
        self.term_index(term).map(|idx| self.idf[idx])
    }

    /// Number of documents the vectorizer was fitted on.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::{CharNgramAnalyzer, PipelineAnalyzer};
    use crate::analysis::tokenizer::{NgramTokenizer, UnicodeWordTokenizer};

    fn trigram_vectorizer(weighting: Weighting) -> TfIdfVectorizer {
        let analyzer = Arc::new(CharNgramAnalyzer::new(NgramTokenizer::trigram()));
        TfIdfVectorizer::with_weighting(analyzer, weighting)
    }

    #[test]
    fn test_debug_names_the_analyzer() {
        let analyzer = PipelineAnalyzer::new(Arc::new(UnicodeWordTokenizer::new()))
            .with_name("whole_string_words");
        let vectorizer = TfIdfVectorizer::with_weighting(Arc::new(analyzer), Weighting::Tf);

        let debug = format!("{vectorizer:?}");
        assert!(debug.contains("\"whole_string_words\""), "{debug}");
    }

    #[test]
    fn test_vocabulary_in_first_seen_order() {
        let mut vectorizer = trigram_vectorizer(Weighting::TfIdf);
        vectorizer.fit(["B737", "B738"]).unwrap();

        assert_eq!(vectorizer.vocabulary_size(), 3);
        assert_eq!(vectorizer.term_index("B73"), Some(0));
        assert_eq!(vectorizer.term_index("737"), Some(1));
        assert_eq!(vectorizer.term_index("738"), Some(2));
        assert_eq!(vectorizer.n_documents(), 2);
    }

    #[test]
    fn test_idf_favours_rare_terms() {
        let mut vectorizer = trigram_vectorizer(Weighting::TfIdf);
        vectorizer.fit(["B737", "B738", "B739"]).unwrap();

        let common = vectorizer.idf("B73").unwrap();
        let rare = vectorizer.idf("737").unwrap();
        // df = N gives ln(1) + 1
        assert!((common - 1.0).abs() < 1e-6);
        assert!((rare - ((4.0f32 / 2.0).ln() + 1.0)).abs() < 1e-6);
        assert!(rare > common);
    }

    #[test]
    fn test_tfidf_transform() {
        let mut vectorizer = trigram_vectorizer(Weighting::TfIdf);
        vectorizer.fit(["B737", "B738"]).unwrap();

        let features = vectorizer.transform("B737").unwrap();
        assert_eq!(features.dimension(), 3);
        assert_eq!(features.nnz(), 2);

        let idf_common = vectorizer.idf("B73").unwrap();
        let idf_rare = vectorizer.idf("737").unwrap();
        assert!((features.get(0) - 0.5 * idf_common).abs() < 1e-6);
        assert!((features.get(1) - 0.5 * idf_rare).abs() < 1e-6);
        assert_eq!(features.get(2), 0.0);
    }

    #[test]
    fn test_tf_counts_and_unknown_terms() {
        let mut vectorizer = trigram_vectorizer(Weighting::Tf);
        vectorizer.fit(["AAAA"]).unwrap();

        let features = vectorizer.transform("AAAAZZZ").unwrap();
        // "AAA" appears twice, every other gram is unseen
        assert_eq!(features.nnz(), 1);
        assert_eq!(features.get(0), 2.0);
    }
}
