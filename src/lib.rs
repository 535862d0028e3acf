pub mod config;
pub mod error;
pub mod extractors;
pub mod models;
pub mod parser;
pub mod response;

// Re-export commonly used types for easier access
pub use config::JsonApiConfig;
pub use error::{AppError, AppResult};
pub use extractors::{JsonApiFieldSet, JsonApiFilter, JsonApiPage};
pub use models::Page;
pub use parser::{decode_query, DecodedQuery, FieldSet, FilterOperator, FilterSet, PageRequest};
pub use response::{Identity, JsonApiResource, ResponseBuilder, ResponseDocument};
