use serde::{Deserialize, Serialize};

use super::bracket::split_values;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub attribute: String,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(attribute: impl Into<String>, order: SortOrder) -> Self {
        SortSpec {
            attribute: attribute.into(),
            order,
        }
    }

    pub fn asc(attribute: impl Into<String>) -> Self {
        Self::new(attribute, SortOrder::Ascending)
    }

    pub fn desc(attribute: impl Into<String>) -> Self {
        Self::new(attribute, SortOrder::Descending)
    }

    /// `-name` sorts descending on `name`, `name` ascending.
    pub fn from_token(token: &str) -> Option<SortSpec> {
        let token = token.trim();
        match token.strip_prefix('-') {
            Some(attribute) if !attribute.is_empty() => Some(Self::desc(attribute)),
            Some(_) => None,
            None if !token.is_empty() => Some(Self::asc(token)),
            None => None,
        }
    }
}

/// Parse the raw values of the `sort` parameter into a multi-key ordering.
///
/// Tokens keep their encounter order; empty tokens are skipped. No values
/// means unsorted, i.e. an empty list.
pub fn parse_sort<S: AsRef<str>>(raw_values: &[S]) -> Vec<SortSpec> {
    split_values(raw_values)
        .iter()
        .filter_map(|token| SortSpec::from_token(token))
        .collect()
}
