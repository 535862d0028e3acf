use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bracket::{split_values, QueryParams};
use super::sort_parser::{parse_sort, SortSpec};
use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::{AppError, AppResult};

/// Normalized page request.
///
/// `page_number` is a zero-based index; on the wire pages are one-based, so
/// `page[number]=3` becomes index 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page_number: u32,
    pub page_size: u32,
    pub sort: Vec<SortSpec>,
}

impl PageRequest {
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number,
            page_size,
            sort: Vec::new(),
        }
    }

    pub fn with_sort(mut self, sort: Vec<SortSpec>) -> Self {
        self.sort = sort;
        self
    }

    pub fn is_sorted(&self) -> bool {
        !self.sort.is_empty()
    }

    /// Number of items to skip before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number) * u64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

fn parse_int(key: &str, token: &str) -> AppResult<i64> {
    token
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::malformed(key, format!("expected integer but got: {}", token)))
}

/// Build a [`PageRequest`] from `page_name[number|page]`, `page_name[size|limit]`
/// and the bare `sort_name` parameter.
///
/// Unknown subkeys are ignored. A page number below 1 selects the first page and
/// a size below 1 falls back to `default_size`.
pub fn parse_page(
    params: &QueryParams,
    page_name: &str,
    sort_name: &str,
    default_size: u32,
) -> AppResult<PageRequest> {
    let mut requested_number: Option<i64> = None;
    let mut requested_size: Option<i64> = None;

    for param in params.bracket_family(page_name) {
        let Some(subkey) = param.segments.first() else {
            continue;
        };
        let tokens = split_values(&param.raw_values);
        let Some(first) = tokens.first() else {
            continue;
        };

        match subkey.as_str() {
            "number" | "page" => requested_number = Some(parse_int(&param.key, first)?),
            "size" | "limit" => requested_size = Some(parse_int(&param.key, first)?),
            _ => {}
        }
    }

    let page_number = requested_number
        .map(|number| number.saturating_sub(1).clamp(0, i64::from(u32::MAX)) as u32)
        .unwrap_or(0);
    let page_size = match requested_size {
        Some(size) if size >= 1 => size.min(i64::from(u32::MAX)) as u32,
        _ => default_size,
    };
    let sort = params.get(sort_name).map(parse_sort::<String>).unwrap_or_default();

    debug!(page_number, page_size, sort_keys = sort.len(), "decoded page request");
    Ok(PageRequest {
        page_number,
        page_size,
        sort,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::sort_parser::SortOrder;

    fn page(pairs: &[(&str, &str)]) -> AppResult<PageRequest> {
        parse_page(
            &QueryParams::from_pairs(pairs.iter().copied()),
            "page",
            "sort",
            DEFAULT_PAGE_SIZE,
        )
    }

    #[test]
    fn test_number_and_size() {
        let request = page(&[("page[number]", "3"), ("page[size]", "10")]).unwrap();
        assert_eq!(request.page_number, 2);
        assert_eq!(request.page_size, 10);
        assert_eq!(request.offset(), 20);
    }

    #[test]
    fn test_aliases() {
        let request = page(&[("page[page]", "2"), ("page[limit]", "5")]).unwrap();
        assert_eq!(request.page_number, 1);
        assert_eq!(request.page_size, 5);
    }

    #[test]
    fn test_defaults() {
        let request = page(&[]).unwrap();
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.page_size, 25);
        assert!(!request.is_sorted());
    }

    #[test]
    fn test_first_page_is_index_zero() {
        assert_eq!(page(&[("page[number]", "1")]).unwrap().page_number, 0);
        assert_eq!(page(&[("page[number]", "0")]).unwrap().page_number, 0);
        assert_eq!(page(&[("page[number]", "-4")]).unwrap().page_number, 0);
    }

    #[test]
    fn test_size_below_one_resets() {
        assert_eq!(page(&[("page[size]", "0")]).unwrap().page_size, 25);
        assert_eq!(page(&[("page[size]", "-3")]).unwrap().page_size, 25);
    }

    #[test]
    fn test_custom_default_size() {
        let request = parse_page(&QueryParams::new(), "page", "sort", 50).unwrap();
        assert_eq!(request.page_size, 50);
    }

    #[test]
    fn test_first_token_used() {
        let request = page(&[("page[size]", "7,9")]).unwrap();
        assert_eq!(request.page_size, 7);
    }

    #[test]
    fn test_unknown_subkey_ignored() {
        let request = page(&[("page[cursor]", "abc"), ("page[size]", "3")]).unwrap();
        assert_eq!(request.page_size, 3);
        assert_eq!(request.page_number, 0);
    }

    #[test]
    fn test_non_numeric_is_malformed() {
        let result = page(&[("page[number]", "two")]);
        match result {
            Err(AppError::MalformedParameter { parameter, .. }) => assert_eq!(parameter, "page[number]"),
            other => panic!("Expected MalformedParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_sort_with_page() {
        let request = page(&[("page[number]", "2"), ("sort", "name,-age")]).unwrap();
        assert_eq!(request.page_number, 1);
        assert_eq!(request.sort.len(), 2);
        assert_eq!(request.sort[0].attribute, "name");
        assert_eq!(request.sort[0].order, SortOrder::Ascending);
        assert_eq!(request.sort[1].attribute, "age");
        assert_eq!(request.sort[1].order, SortOrder::Descending);
    }
}
