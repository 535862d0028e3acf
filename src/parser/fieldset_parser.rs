use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::bracket::QueryParams;
use crate::error::{AppError, AppResult};

/// Sparse fieldsets: resource type -> requested field names.
///
/// A type mapped to an empty set asks for no fields at all, which is not the
/// same as the type being absent (no restriction).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSet {
    request_fields: BTreeMap<String, BTreeSet<String>>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_resource(&self, resource_type: &str) -> bool {
        self.request_fields.contains_key(resource_type)
    }

    pub fn is_empty(&self) -> bool {
        self.request_fields.is_empty()
    }

    pub fn all_fields(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.request_fields
    }

    /// Requested fields for the type, empty when the type is absent.
    pub fn fields_by_resource_type(&self, resource_type: &str) -> BTreeSet<String> {
        self.request_fields
            .get(resource_type)
            .cloned()
            .unwrap_or_default()
    }

    /// Union `new_fields` into the type's set, creating it when absent.
    pub fn add_fields<I, S>(&mut self, resource_type: impl Into<String>, new_fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request_fields
            .entry(resource_type.into())
            .or_default()
            .extend(new_fields.into_iter().map(Into::into));
    }

    pub fn contains_field(&self, resource_type: &str, required_field: &str) -> bool {
        self.contains_fields(resource_type, [required_field])
    }

    /// `false` when the type is absent.
    pub fn contains_fields<'a, I>(&self, resource_type: &str, required_fields: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        match self.request_fields.get(resource_type) {
            Some(fields) => required_fields.into_iter().all(|field| fields.contains(field)),
            None => false,
        }
    }

    fn put(&mut self, resource_type: String, fields: BTreeSet<String>) {
        self.request_fields.insert(resource_type, fields);
    }
}

/// Build a [`FieldSet`] from every `fields_name[type]` parameter.
///
/// A single raw value is split on `,`; several raw values for one key are
/// ambiguous and resolve to an empty set. Only the first bracket segment is
/// read.
pub fn parse_field_set(params: &QueryParams, fields_name: &str) -> AppResult<FieldSet> {
    let mut field_set = FieldSet::new();

    for param in params.bracket_family(fields_name) {
        let resource_type = param
            .segments
            .first()
            .map(|segment| segment.trim())
            .unwrap_or_default();

        if resource_type.is_empty() {
            return Err(AppError::malformed(
                param.key.clone(),
                format!(
                    "Could not prepare spread fields set! Argument format wrong! Valid format example: {}[resource-type]=field_1,field_2",
                    fields_name
                ),
            ));
        }

        let fields: BTreeSet<String> = match param.raw_values.as_slice() {
            [single] => single
                .split(',')
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .map(str::to_string)
                .collect(),
            _ => BTreeSet::new(),
        };

        debug!(resource_type = %resource_type, fields = fields.len(), "decoded sparse fieldset");
        field_set.put(resource_type.to_string(), fields);
    }

    Ok(field_set)
}
