use axum::http::StatusCode;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use super::document::{
    ApiMeta, ErrorObject, Links, Meta, PageMeta, PrimaryData, ResourceObject, ResponseDocument,
    TraceMeta, WebSocketMeta,
};
use super::link::replace_uri_placeholders;
use super::resource::{resolve_identity, JsonApiResource};
use crate::config::{JsonApiConfig, DEFAULT_API_VERSION, DEFAULT_PAGE_SIZE};
use crate::error::{AppError, AppResult};
use crate::models::Page;

pub const VALIDATION_ERROR_CODE: &str = "VALIDATION_ERROR";

enum StagedData<V> {
    Empty,
    Single(ResourceObject<V>),
    Collection(Vec<ResourceObject<V>>),
}

/// Single-use accumulator for one response document.
///
/// Chain configuration calls and finish with [`ResponseBuilder::build`]. A
/// manual resource type or id must be set before any data, since data is
/// wrapped as soon as it is supplied. Once an error has been recorded the
/// document is an error document and later data is dropped.
///
/// ```
/// use jsonapi_simple::response::ResponseBuilder;
///
/// let document = ResponseBuilder::new()
///     .uri("/api/v1/users/{userId}/settings", &["7"])?
///     .json_api_type("settings")
///     .json_api_id("default")
///     .data(serde_json::json!({"theme": "dark"}))?
///     .build();
///
/// let resource = document.single().unwrap();
/// assert_eq!(resource.links.self_link, "/api/v1/users/7/settings/default");
/// assert_eq!(document.meta.page.total, 1);
/// # Ok::<(), jsonapi_simple::error::AppError>(())
/// ```
pub struct ResponseBuilder<V> {
    meta: Meta,
    total: Option<u64>,
    uri_prefix: String,
    json_api_type: Option<String>,
    json_api_id: Option<String>,
    manual_type: bool,
    data: StagedData<V>,
    errors: Vec<ErrorObject>,
}

impl<V> Default for ResponseBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ResponseBuilder<V> {
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_API_VERSION, DEFAULT_PAGE_SIZE)
    }

    /// Builder seeded with the configured api version and page size.
    pub fn with_config(config: &JsonApiConfig) -> Self {
        Self::with_settings(&config.api.version, config.page.default_size)
    }

    fn with_settings(api_version: &str, max_page_size: u32) -> Self {
        Self {
            meta: Meta {
                api: ApiMeta {
                    version: api_version.to_string(),
                },
                page: PageMeta {
                    max_size: max_page_size,
                    ..PageMeta::default()
                },
                web_socket: None,
                trace: None,
            },
            total: None,
            uri_prefix: String::new(),
            json_api_type: None,
            json_api_id: None,
            manual_type: false,
            data: StagedData::Empty,
            errors: Vec::new(),
        }
    }

    /// Set the link prefix, filling `{name}` / `${name}` placeholders from `args`
    /// in order.
    pub fn uri<S: AsRef<str>>(mut self, template: &str, args: &[S]) -> AppResult<Self> {
        self.uri_prefix = replace_uri_placeholders(template, args)?;
        Ok(self)
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.meta.api.version = version.into();
        self
    }

    /// Manual id for the data; blank ids are ignored.
    pub fn json_api_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        if !id.trim().is_empty() {
            self.json_api_id = Some(id);
        }
        self
    }

    /// Manual resource type for the data; blank types are ignored.
    pub fn json_api_type(mut self, resource_type: impl Into<String>) -> Self {
        let resource_type = resource_type.into();
        if !resource_type.trim().is_empty() {
            self.json_api_type = Some(resource_type);
            self.manual_type = true;
        }
        self
    }

    pub fn error(self, status: StatusCode, detail: impl Into<String>) -> Self {
        self.push_error(ErrorObject::new(status, detail))
    }

    pub fn error_with_code(
        self,
        status: StatusCode,
        code: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        self.push_error(ErrorObject::new(status, detail).with_code(code))
    }

    /// 400 error pointing at the field that failed validation.
    pub fn validation_error(self, field: impl Into<String>, detail: impl Into<String>) -> Self {
        self.push_error(
            ErrorObject::new(StatusCode::BAD_REQUEST, detail)
                .with_code(VALIDATION_ERROR_CODE)
                .with_source_parameter(field),
        )
    }

    /// Append an error and discard any staged data.
    pub fn push_error(mut self, error: ErrorObject) -> Self {
        debug!(status = error.status, code = ?error.code, "recorded response error");
        self.errors.push(error);
        self.data = StagedData::Empty;
        self
    }

    /// Override the computed total.
    pub fn total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn page(mut self, max_size: u32, total: u64) -> Self {
        self.meta.page.max_size = max_size;
        self.total = Some(total);
        self
    }

    pub fn page_size(mut self, max_size: u32) -> Self {
        self.meta.page.max_size = max_size;
        self
    }

    /// Cursor of the previous page.
    pub fn page_prev(mut self, prev: impl Into<String>) -> Self {
        self.meta.page.prev = Some(prev.into());
        self
    }

    /// Cursor of the next page.
    pub fn page_next(mut self, next: impl Into<String>) -> Self {
        self.meta.page.next = Some(next.into());
        self
    }

    pub fn meta_web_socket(mut self, session_id: Uuid) -> Self {
        self.meta.web_socket = Some(WebSocketMeta { session_id });
        self
    }

    pub fn meta_trace(mut self, id: impl Into<String>) -> Self {
        self.meta.trace = Some(TraceMeta { id: id.into() });
        self
    }

    pub fn build(self) -> ResponseDocument<V> {
        let mut meta = self.meta;

        if !self.errors.is_empty() {
            meta.page.total = self.total.unwrap_or(0);
            return ResponseDocument {
                data: None,
                errors: Some(self.errors),
                meta,
            };
        }

        let (data, computed_total) = match self.data {
            StagedData::Empty => (None, 0),
            StagedData::Single(resource) => (Some(PrimaryData::Single(resource)), 1),
            StagedData::Collection(resources) => {
                let len = resources.len() as u64;
                (Some(PrimaryData::Collection(resources)), len)
            }
        };
        meta.page.total = self.total.unwrap_or(computed_total);

        ResponseDocument {
            data,
            errors: None,
            meta,
        }
    }

    fn accepts_data(&self) -> bool {
        if self.errors.is_empty() {
            return true;
        }
        warn!(
            errors = self.errors.len(),
            "Ignoring response data because errors were already recorded"
        );
        false
    }

    fn finalize_uri_prefix(&mut self, resource_type: &str) {
        let suffix = format!("/{}", resource_type);
        if !self.uri_prefix.ends_with(&suffix) {
            self.uri_prefix.push_str(&suffix);
        }
    }
}

impl<V: JsonApiResource> ResponseBuilder<V> {
    /// Wrap one object as the primary data.
    pub fn data(mut self, object: V) -> AppResult<Self> {
        if !self.accepts_data() {
            return Ok(self);
        }
        let resource_type = self.resolve_type()?;
        self.finalize_uri_prefix(&resource_type);
        self.data = StagedData::Single(self.wrap(&resource_type, object)?);
        Ok(self)
    }

    /// Wrap every object as a collection.
    ///
    /// An empty collection yields `data: []` and leaves the resource type and
    /// link prefix untouched.
    pub fn data_collection<I>(mut self, objects: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = V>,
    {
        if !self.accepts_data() {
            return Ok(self);
        }
        let mut objects = objects.into_iter().peekable();
        if objects.peek().is_none() {
            self.data = StagedData::Collection(Vec::new());
            return Ok(self);
        }

        let resource_type = self.resolve_type()?;
        self.finalize_uri_prefix(&resource_type);
        let resources = objects
            .map(|object| self.wrap(&resource_type, object))
            .collect::<AppResult<Vec<_>>>()?;
        self.data = StagedData::Collection(resources);
        Ok(self)
    }

    /// Stage a service page: its items, total and cursors.
    pub fn page_result(self, page: Page<V>) -> AppResult<Self> {
        let Page {
            data,
            prev,
            next,
            total,
        } = page;

        let mut builder = self.data_collection(data)?.total(total);
        builder.meta.page.prev = prev;
        builder.meta.page.next = next;
        Ok(builder)
    }

    fn resolve_type(&mut self) -> AppResult<String> {
        if let Some(resource_type) = &self.json_api_type {
            return Ok(resource_type.clone());
        }
        let resource_type = V::type_name().ok_or_else(|| {
            AppError::Configuration(format!(
                "Could not create response! {} declares no JSON:API resource type",
                std::any::type_name::<V>()
            ))
        })?;
        self.json_api_type = Some(resource_type.to_string());
        Ok(resource_type.to_string())
    }

    fn wrap(&self, resource_type: &str, object: V) -> AppResult<ResourceObject<V>> {
        // The identity attribute is only dropped when it is what `id` carries.
        let (id, identity_field) = match &self.json_api_id {
            Some(id) => (id.clone(), None),
            None => match resolve_identity(&object)? {
                Some(id) => (id, V::identity_field()),
                None if self.manual_type => {
                    let id = Uuid::new_v4().to_string();
                    trace!("Create JSON API response random response id: {}", id);
                    (id, None)
                }
                None => {
                    return Err(AppError::Configuration(format!(
                        "Could not create response! {} declares no identity field",
                        std::any::type_name::<V>()
                    )))
                }
            },
        };

        Ok(ResourceObject {
            resource_type: resource_type.to_string(),
            links: Links {
                self_link: format!("{}/{}", self.uri_prefix, id),
                related: None,
            },
            id,
            attributes: object,
            identity_field,
        })
    }
}
