#![allow(dead_code)]

use axum::{extract::Path, routing::get, Extension, Json, Router};
use chrono::{DateTime, Utc};
use jsonapi_simple::config::JsonApiConfig;
use jsonapi_simple::error::AppError;
use jsonapi_simple::extractors::{JsonApiFieldSet, JsonApiFilter, JsonApiPage};
use jsonapi_simple::models::Page;
use jsonapi_simple::parser::DecodedQuery;
use jsonapi_simple::response::{Identity, JsonApiResource, ResponseBuilder, ResponseDocument};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub const TEST_RESPONSE_URI: &str = "/api/v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDto {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    pub create_date: DateTime<Utc>,
}

impl TestDto {
    pub const API_TYPE: &'static str = "test-type";

    pub fn new(name: &str) -> Self {
        Self {
            id: Some(Uuid::new_v4()),
            name: name.to_string(),
            create_date: Utc::now(),
        }
    }

    pub fn self_link(&self, uri: &str) -> String {
        match self.id {
            Some(id) => format!("{}/{}/{}", uri, Self::API_TYPE, id),
            None => format!("{}/{}", uri, Self::API_TYPE),
        }
    }
}

impl JsonApiResource for TestDto {
    fn type_name() -> Option<&'static str> {
        Some(Self::API_TYPE)
    }

    fn identity_field() -> Option<&'static str> {
        Some("id")
    }

    fn identity(&self) -> Identity {
        Identity::of(self.id.as_ref())
    }
}

/// Resource whose numeric id is stringified for the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarDto {
    pub id: i64,
    pub brand: String,
}

impl JsonApiResource for CarDto {
    fn type_name() -> Option<&'static str> {
        Some("cars")
    }

    fn identity_field() -> Option<&'static str> {
        Some("id")
    }

    fn identity(&self) -> Identity {
        Identity::from(&self.id)
    }
}

pub fn cars() -> Vec<CarDto> {
    vec![
        CarDto {
            id: 1,
            brand: "Volvo".to_string(),
        },
        CarDto {
            id: 2,
            brand: "Skoda".to_string(),
        },
        CarDto {
            id: 3,
            brand: "Mazda".to_string(),
        },
    ]
}

/// Percent-encoded query string built from `(key, value)` pairs.
pub fn query(pairs: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().copied())
        .finish()
}

async fn list_users(
    JsonApiFilter(filter): JsonApiFilter,
    JsonApiFieldSet(fields): JsonApiFieldSet,
    JsonApiPage(page): JsonApiPage,
) -> Json<DecodedQuery> {
    Json(DecodedQuery {
        filter,
        fields,
        page,
    })
}

async fn get_user(Path(name): Path<String>) -> Result<ResponseDocument<TestDto>, AppError> {
    if name == "missing" {
        return Ok(ResponseBuilder::new()
            .error_with_code(
                axum::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("User {} not found", name),
            )
            .build());
    }

    Ok(ResponseBuilder::new()
        .uri(TEST_RESPONSE_URI, &[] as &[&str])?
        .data(TestDto::new(&name))?
        .build())
}

async fn list_user_cars(
    Path(user_id): Path<String>,
    JsonApiPage(page): JsonApiPage,
) -> Result<ResponseDocument<CarDto>, AppError> {
    let all = cars();
    let total = all.len() as u64;
    let offset = page.offset() as usize;
    let items: Vec<CarDto> = all
        .into_iter()
        .skip(offset)
        .take(page.page_size as usize)
        .collect();

    let mut result = Page::of(items).with_total(total);
    if offset + (page.page_size as usize) < total as usize {
        result = result.with_next((page.page_number + 2).to_string());
    }

    Ok(ResponseBuilder::new()
        .uri("/api/v1/users/{userId}", &[user_id])?
        .page_size(page.page_size)
        .page_result(result)?
        .build())
}

/// Router exercising the extractors and the response builder. `config`, when
/// given, is installed as an extension layer.
pub fn setup_test_app(config: Option<JsonApiConfig>) -> Router {
    let router = Router::new()
        .route("/api/v1/users", get(list_users))
        .route("/api/v1/users/{userId}", get(get_user))
        .route("/api/v1/users/{userId}/cars", get(list_user_cars));

    match config {
        Some(config) => router.layer(Extension(Arc::new(config))),
        None => router,
    }
}
