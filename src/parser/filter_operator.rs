use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operators accepted in `filter[field][operator]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterOperator {
    In,
    NotIn,
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Contain,
    NotContain,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 10] = [
        FilterOperator::In,
        FilterOperator::NotIn,
        FilterOperator::Eq,
        FilterOperator::Ne,
        FilterOperator::Gt,
        FilterOperator::Gte,
        FilterOperator::Lt,
        FilterOperator::Lte,
        FilterOperator::Contain,
        FilterOperator::NotContain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::In => "IN",
            FilterOperator::NotIn => "NOT_IN",
            FilterOperator::Eq => "EQ",
            FilterOperator::Ne => "NE",
            FilterOperator::Gt => "GT",
            FilterOperator::Gte => "GTE",
            FilterOperator::Lt => "LT",
            FilterOperator::Lte => "LTE",
            FilterOperator::Contain => "CONTAIN",
            FilterOperator::NotContain => "NOT_CONTAIN",
        }
    }

    /// Case-insensitive lookup; `None` for blank or unknown names.
    pub fn of(name: &str) -> Option<FilterOperator> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(name))
    }

    /// Same as [`FilterOperator::of`] but falls back to `Eq`.
    pub fn of_or_default(name: &str) -> FilterOperator {
        Self::of(name).unwrap_or_default()
    }

    /// Only list operators may carry more than one value.
    pub fn accepts_list(&self) -> bool {
        matches!(self, FilterOperator::In | FilterOperator::NotIn)
    }
}

impl Default for FilterOperator {
    fn default() -> Self {
        FilterOperator::Eq
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
