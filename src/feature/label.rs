//! Label vocabulary: string labels to integer keys and back.

use ahash::AHashMap;

use crate::error::{FlightCodeError, Result};

/// Integer key of an encoded label.
pub type LabelKey = u32;

/// Maps label strings to keys in order of first occurrence and back.
///
/// # Examples
///
/// ```
/// use flightcode::feature::label::LabelEncoder;
///
/// let encoder = LabelEncoder::fit(["738", "320", "738"]);
/// assert_eq!(encoder.len(), 2);
/// assert_eq!(encoder.encode("320").unwrap(), 1);
/// assert_eq!(encoder.decode(0).unwrap(), "738");
/// assert!(encoder.encode("E90").is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct LabelEncoder {
    labels: Vec<String>,
    keys: AHashMap<String, LabelKey>,
}

impl LabelEncoder {
    /// Build the vocabulary from labels in iteration order.
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut encoder = LabelEncoder::default();
        for label in labels {
            let label = label.as_ref();
            if !encoder.keys.contains_key(label) {
                let key = encoder.labels.len() as LabelKey;
                encoder.keys.insert(label.to_string(), key);
                encoder.labels.push(label.to_string());
            }
        }
        encoder
    }

    /// Key for `label`.
    ///
    /// # Errors
    ///
    /// `UnknownLabel` if the label was not present when fitting.
    pub fn encode(&self, label: &str) -> Result<LabelKey> {
        self.keys
            .get(label)
            .copied()
            .ok_or_else(|| FlightCodeError::unknown_label(label))
    }

    /// Label for `key`.
    pub fn decode(&self, key: LabelKey) -> Result<&str> {
        self.labels
            .get(key as usize)
            .map(String::as_str)
            .ok_or_else(|| FlightCodeError::unknown_label(format!("#{key}")))
    }

    /// Whether `label` is known.
    pub fn contains(&self, label: &str) -> bool {
        self.keys.contains_key(label)
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether no labels are known.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in key order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
