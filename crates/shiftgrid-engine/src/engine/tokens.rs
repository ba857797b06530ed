//! Special day markers (absence, break, ...) and their numeric substitutes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Closed set of special tokens, each standing in for a fixed number of hours
/// during calculation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecialTokens {
    values: BTreeMap<String, i64>,
}

impl SpecialTokens {
    pub fn new(values: BTreeMap<String, i64>) -> SpecialTokens {
        SpecialTokens { values }
    }

    pub fn is_special(&self, content: &str) -> bool {
        self.values.contains_key(content)
    }

    /// Numeric substitute for a token, if `content` is one.
    pub fn value(&self, content: &str) -> Option<i64> {
        self.values.get(content).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl Default for SpecialTokens {
    /// `A` (absence) counts as a full 8 hour day; `B` (break) and `C` (other) count nothing.
    fn default() -> Self {
        let values = [("A", 8), ("B", 0), ("C", 0)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        SpecialTokens { values }
    }
}
