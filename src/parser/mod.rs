pub mod bracket;
pub mod fieldset_parser;
pub mod filter_operator;
pub mod filter_parser;
pub mod page_parser;
pub mod sort_parser;

use serde::{Deserialize, Serialize};

use crate::config::JsonApiConfig;
use crate::error::AppResult;

pub use bracket::{parse_bracket_key, split_values, BracketParam, QueryParams};
pub use fieldset_parser::{parse_field_set, FieldSet};
pub use filter_operator::FilterOperator;
pub use filter_parser::{parse_filter, FilterExpression, FilterSet, FilterValue};
pub use page_parser::{parse_page, PageRequest};
pub use sort_parser::{parse_sort, SortOrder, SortSpec};

/// Everything a list endpoint reads from its query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedQuery {
    pub filter: FilterSet,
    pub fields: FieldSet,
    pub page: PageRequest,
}

impl DecodedQuery {
    pub fn from_params(config: &JsonApiConfig, params: &QueryParams) -> AppResult<Self> {
        Ok(Self {
            filter: parse_filter(params, &config.params.filter)?,
            fields: parse_field_set(params, &config.params.fields)?,
            page: parse_page(
                params,
                &config.params.page,
                &config.params.sort,
                config.page.default_size,
            )?,
        })
    }
}

/// Decode filter, sparse fieldsets and paging from a raw query string.
pub fn decode_query(config: &JsonApiConfig, query: &str) -> AppResult<DecodedQuery> {
    DecodedQuery::from_params(config, &QueryParams::parse(query))
}
