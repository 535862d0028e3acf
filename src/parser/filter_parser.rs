use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

use super::bracket::{split_values, QueryParams};
use crate::error::{AppError, AppResult};
pub use crate::parser::filter_operator::FilterOperator;

/// Value side of a filter expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Single(String),
    List(Vec<String>),
}

impl FilterValue {
    pub fn len(&self) -> usize {
        match self {
            FilterValue::Single(_) => 1,
            FilterValue::List(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn first(&self) -> Option<&str> {
        match self {
            FilterValue::Single(value) => Some(value),
            FilterValue::List(values) => values.first().map(String::as_str),
        }
    }

    pub fn to_vec(&self) -> Vec<String> {
        match self {
            FilterValue::Single(value) => vec![value.clone()],
            FilterValue::List(values) => values.clone(),
        }
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Single(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Single(value.to_string())
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Single(value.to_string())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Single(value.to_string())
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Single(value.to_string())
    }
}

impl From<Uuid> for FilterValue {
    fn from(value: Uuid) -> Self {
        FilterValue::Single(value.to_string())
    }
}

impl<T: ToString> From<Vec<T>> for FilterValue {
    fn from(values: Vec<T>) -> Self {
        FilterValue::List(values.iter().map(ToString::to_string).collect())
    }
}

/// One `(field, operator, value)` condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterExpression {
    pub field: String,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

impl FilterExpression {
    pub fn new(
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<FilterValue>,
    ) -> AppResult<Self> {
        let value = value.into();
        validate_operator_with_value(operator, &value)?;
        Ok(Self {
            field: field.into(),
            operator,
            value,
        })
    }
}

/// Operator and value, still waiting for a field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCondition {
    pub operator: FilterOperator,
    pub value: FilterValue,
}

impl FilterCondition {
    pub fn field(self, field: impl Into<String>) -> FilterExpression {
        FilterExpression {
            field: field.into(),
            operator: self.operator,
            value: self.value,
        }
    }
}

fn condition(operator: FilterOperator, value: impl Into<FilterValue>) -> AppResult<FilterCondition> {
    let value = value.into();
    validate_operator_with_value(operator, &value)?;
    Ok(FilterCondition { operator, value })
}

pub fn eq(value: impl Into<FilterValue>) -> AppResult<FilterCondition> {
    condition(FilterOperator::Eq, value)
}

pub fn not_eq(value: impl Into<FilterValue>) -> AppResult<FilterCondition> {
    condition(FilterOperator::Ne, value)
}

pub fn gt(value: impl Into<FilterValue>) -> AppResult<FilterCondition> {
    condition(FilterOperator::Gt, value)
}

pub fn gte(value: impl Into<FilterValue>) -> AppResult<FilterCondition> {
    condition(FilterOperator::Gte, value)
}

pub fn lt(value: impl Into<FilterValue>) -> AppResult<FilterCondition> {
    condition(FilterOperator::Lt, value)
}

pub fn lte(value: impl Into<FilterValue>) -> AppResult<FilterCondition> {
    condition(FilterOperator::Lte, value)
}

pub fn contain(value: impl Into<FilterValue>) -> AppResult<FilterCondition> {
    condition(FilterOperator::Contain, value)
}

pub fn not_contain(value: impl Into<FilterValue>) -> AppResult<FilterCondition> {
    condition(FilterOperator::NotContain, value)
}

/// `IN` always stores a list, even for a single value.
pub fn in_list(values: impl Into<FilterValue>) -> AppResult<FilterCondition> {
    condition(FilterOperator::In, FilterValue::List(values.into().to_vec()))
}

pub fn not_in(values: impl Into<FilterValue>) -> AppResult<FilterCondition> {
    condition(FilterOperator::NotIn, FilterValue::List(values.into().to_vec()))
}

pub fn validate_operator_with_value(operator: FilterOperator, value: &FilterValue) -> AppResult<()> {
    if !operator.accepts_list() && value.len() > 1 {
        return Err(AppError::InvalidFilterOperator {
            operator: operator.to_string(),
        });
    }
    Ok(())
}

/// Filter expressions keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    params: BTreeMap<String, FilterExpression>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn get_param(&self, name: &str) -> Option<&FilterExpression> {
        self.params.get(name)
    }

    pub fn all_keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn all_params(&self) -> impl Iterator<Item = &FilterExpression> {
        self.params.values()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Add an `EQ` condition on `key`.
    pub fn add_param(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> AppResult<&mut Self> {
        let key = key.into();
        let expression = eq(value)?.field(key.clone());
        Ok(self.insert(key, expression))
    }

    /// Insert or replace the expression for `key`.
    pub fn insert(&mut self, key: impl Into<String>, expression: FilterExpression) -> &mut Self {
        self.params.insert(key.into(), expression);
        self
    }

    pub fn raw_value(&self, name: &str) -> Option<&FilterValue> {
        self.params.get(name).map(|expression| &expression.value)
    }

    /// First value of the parameter; empty strings count as absent.
    fn first_value(&self, name: &str) -> Option<&str> {
        self.raw_value(name)
            .and_then(FilterValue::first)
            .filter(|value| !value.is_empty())
    }

    fn parse_first<T: FromStr>(&self, name: &str, kind: &str) -> AppResult<Option<T>> {
        match self.first_value(name) {
            Some(value) => value
                .parse::<T>()
                .map(Some)
                .map_err(|_| AppError::malformed(name, format!("expected {} but got: {}", kind, value))),
            None => Ok(None),
        }
    }

    fn parse_list<T: FromStr>(&self, name: &str, kind: &str) -> AppResult<Option<Vec<T>>> {
        match self.raw_value(name) {
            Some(FilterValue::List(values)) => values
                .iter()
                .map(|value| {
                    value.parse::<T>().map_err(|_| {
                        AppError::malformed(name, format!("expected {} but got: {}", kind, value))
                    })
                })
                .collect::<AppResult<Vec<T>>>()
                .map(Some),
            _ => Ok(None),
        }
    }

    pub fn string_value(&self, name: &str) -> Option<String> {
        self.first_value(name).map(str::to_string)
    }

    pub fn int_value(&self, name: &str) -> AppResult<Option<i32>> {
        self.parse_first(name, "integer")
    }

    pub fn long_value(&self, name: &str) -> AppResult<Option<i64>> {
        self.parse_first(name, "long")
    }

    /// `true` (any case) reads as true, any other value as false.
    pub fn bool_value(&self, name: &str) -> Option<bool> {
        self.first_value(name)
            .map(|value| value.eq_ignore_ascii_case("true"))
    }

    pub fn uuid_value(&self, name: &str) -> AppResult<Option<Uuid>> {
        self.parse_first(name, "uuid")
    }

    /// Only list-shaped values answer the list accessors.
    pub fn list_of_string_values(&self, name: &str) -> Option<Vec<String>> {
        match self.raw_value(name) {
            Some(FilterValue::List(values)) => Some(values.clone()),
            _ => None,
        }
    }

    pub fn list_of_int_values(&self, name: &str) -> AppResult<Option<Vec<i32>>> {
        self.parse_list(name, "integer")
    }

    pub fn list_of_uuid_values(&self, name: &str) -> AppResult<Option<Vec<Uuid>>> {
        self.parse_list(name, "uuid")
    }
}

/// Build a [`FilterSet`] from every `filter_name[...]` parameter.
///
/// `name[field]` means `EQ`; `name[field][op]` resolves `op` case-insensitively
/// and falls back to `EQ` for unknown names. Request values are always kept as
/// a list. A later key for the same field replaces the earlier one.
pub fn parse_filter(params: &QueryParams, filter_name: &str) -> AppResult<FilterSet> {
    let mut filter = FilterSet::new();

    for param in params.bracket_family(filter_name) {
        let (field, operator) = match param.segments.as_slice() {
            [field] => (field.clone(), FilterOperator::Eq),
            [field, operator] => (field.clone(), FilterOperator::of_or_default(operator)),
            _ => {
                return Err(AppError::malformed(
                    param.key,
                    format!(
                        "Valid format example: {name}[field]=value or {name}[field][operator]=value",
                        name = filter_name
                    ),
                ))
            }
        };

        if field.trim().is_empty() {
            return Err(AppError::malformed(param.key, "filter field name must not be empty"));
        }

        let value = FilterValue::List(split_values(&param.raw_values));
        validate_operator_with_value(operator, &value)?;

        debug!(field = %field, operator = %operator, "decoded filter parameter");
        filter.insert(
            field.clone(),
            FilterExpression {
                field,
                operator,
                value,
            },
        );
    }

    Ok(filter)
}
