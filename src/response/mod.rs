pub mod builder;
pub mod document;
pub mod link;
pub mod resource;

pub use builder::{ResponseBuilder, VALIDATION_ERROR_CODE};
pub use document::{
    ApiMeta, ErrorLinks, ErrorObject, ErrorSource, Links, Meta, PageMeta, PrimaryData,
    ResourceObject, ResponseDocument, TraceMeta, WebSocketMeta, JSON_API_CONTENT_TYPE,
};
pub use link::replace_uri_placeholders;
pub use resource::{resolve_identity, Identity, JsonApiResource};
