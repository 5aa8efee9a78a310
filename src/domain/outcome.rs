//! Outcome templates and the textual filter that narrows them.

use serde::{Deserialize, Serialize};

use super::float_range::FloatRange;

/// A possible craft output, with the wear sub-range it admits.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutcomeTemplate {
    pub name: String,
    #[serde(default)]
    pub collection: String,
    pub range: FloatRange,
}

impl OutcomeTemplate {
    pub fn new(name: impl Into<String>, collection: impl Into<String>, range: FloatRange) -> Self {
        Self {
            name: name.into(),
            collection: collection.into(),
            range,
        }
    }
}

/// Parsed form of the request's filter text.
///
/// Whitespace separates terms; a template passes when every term occurs,
/// case-insensitively, in its name or its collection. A blank filter passes everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeFilter {
    terms: Vec<String>,
}

impl OutcomeFilter {
    pub fn parse(text: &str) -> Self {
        Self {
            terms: text.split_whitespace().map(str::to_lowercase).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches(&self, template: &OutcomeTemplate) -> bool {
        let name = template.name.to_lowercase();
        let collection = template.collection.to_lowercase();
        self.terms
            .iter()
            .all(|term| name.contains(term.as_str()) || collection.contains(term.as_str()))
    }
}
