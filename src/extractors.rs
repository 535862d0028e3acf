use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

use crate::config::JsonApiConfig;
use crate::error::AppError;
use crate::parser::{
    parse_field_set, parse_filter, parse_page, FieldSet, FilterSet, PageRequest, QueryParams,
};

/// Extractor for `filter[field][operator]=...` query parameters.
///
/// Parameter names come from an `Extension<Arc<JsonApiConfig>>` layer when the
/// router installs one. Malformed input is rejected with a 400 JSON:API error
/// document.
#[derive(Debug, Clone)]
pub struct JsonApiFilter(pub FilterSet);

/// Extractor for `fields[type]=...` sparse fieldsets.
#[derive(Debug, Clone)]
pub struct JsonApiFieldSet(pub FieldSet);

/// Extractor for `page[number]`, `page[size]` and `sort`.
#[derive(Debug, Clone)]
pub struct JsonApiPage(pub PageRequest);

fn request_context(parts: &Parts) -> (Arc<JsonApiConfig>, QueryParams) {
    let config = parts
        .extensions
        .get::<Arc<JsonApiConfig>>()
        .cloned()
        .unwrap_or_default();
    let params = QueryParams::parse(parts.uri.query().unwrap_or_default());
    (config, params)
}

impl<S> FromRequestParts<S> for JsonApiFilter
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let (config, params) = request_context(parts);
        parse_filter(&params, &config.params.filter).map(JsonApiFilter)
    }
}

impl<S> FromRequestParts<S> for JsonApiFieldSet
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let (config, params) = request_context(parts);
        parse_field_set(&params, &config.params.fields).map(JsonApiFieldSet)
    }
}

impl<S> FromRequestParts<S> for JsonApiPage
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let (config, params) = request_context(parts);
        parse_page(
            &params,
            &config.params.page,
            &config.params.sort,
            config.page.default_size,
        )
        .map(JsonApiPage)
    }
}
