//! Resource type names and identities.
//!
//! Resource types declare their JSON:API type name and their identity field by
//! implementing [`JsonApiResource`] instead of carrying runtime markers.

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use crate::error::{AppError, AppResult};

/// Outcome of asking an object for its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// The type has no identity field.
    Undeclared,
    /// The type has an identity field but it holds no value.
    Missing,
    Value(String),
}

impl Identity {
    /// Identity from an optional identity field value, stringified with `Display`.
    pub fn of<T: ToString + ?Sized>(value: Option<&T>) -> Identity {
        match value {
            Some(value) => Identity::Value(value.to_string()),
            None => Identity::Missing,
        }
    }
}

impl<T: ToString> From<&T> for Identity {
    fn from(value: &T) -> Self {
        Identity::Value(value.to_string())
    }
}

pub trait JsonApiResource {
    /// JSON:API `type` of this resource, `None` when the type declares none.
    fn type_name() -> Option<&'static str>
    where
        Self: Sized,
    {
        None
    }

    /// Attribute name of the identity field; omitted from `attributes` on output.
    fn identity_field() -> Option<&'static str>
    where
        Self: Sized,
    {
        None
    }

    fn identity(&self) -> Identity {
        Identity::Undeclared
    }
}

/// Read the identity of `object`.
///
/// `Ok(None)` when the type declares no identity field, so the caller picks the
/// fallback; an identity field without a value is a configuration error.
pub fn resolve_identity<T: JsonApiResource>(object: &T) -> AppResult<Option<String>> {
    match object.identity() {
        Identity::Value(id) => Ok(Some(id)),
        Identity::Undeclared => Ok(None),
        Identity::Missing => Err(AppError::Configuration(format!(
            "Could not create response! Identity field {} of {} must be populated",
            T::identity_field().unwrap_or("id"),
            T::type_name().unwrap_or(std::any::type_name::<T>())
        ))),
    }
}

// Untyped payloads: usable only with a manually supplied resource type.
impl JsonApiResource for Value {}

impl<V> JsonApiResource for HashMap<String, V> {}

impl<V> JsonApiResource for BTreeMap<String, V> {}
