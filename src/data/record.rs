//! The labeled record type.

use serde::{Deserialize, Serialize};

/// One labeled example: a flight code and the IATA code it maps to.
///
/// Empty strings are literal values, not missing data.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Raw flight designator, e.g. `B737-800`
    pub code: String,
    /// Categorical target, e.g. `738`
    pub label: String,
}

impl Record {
    /// Create a new record.
    pub fn new<C: Into<String>, L: Into<String>>(code: C, label: L) -> Self {
        Record {
            code: code.into(),
            label: label.into(),
        }
    }
}

impl<C: Into<String>, L: Into<String>> From<(C, L)> for Record {
    fn from((code, label): (C, L)) -> Self {
        Record::new(code, label)
    }
}
