use axum::http::{header, StatusCode};
use axum_test::TestServer;
use jsonapi_simple::config::JsonApiConfig;
use serde_json::{json, Value};

mod common;
use common::{query, setup_test_app};

#[tokio::test]
async fn test_filter_fields_and_page_decoded() {
    let server = TestServer::new(setup_test_app(None)).unwrap();

    let url = format!(
        "/api/v1/users?{}",
        query(&[
            ("filter[name][in]", "a,b,c"),
            ("filter[age][GTE]", "18"),
            ("fields[cars]", "id,brand"),
            ("fields[users]", "id,name"),
            ("page[number]", "3"),
            ("page[size]", "10"),
            ("sort", "name,-age"),
        ])
    );
    let response = server.get(&url).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(
        body["filter"]["name"],
        json!({"field": "name", "operator": "IN", "value": ["a", "b", "c"]})
    );
    assert_eq!(body["filter"]["age"]["operator"], "GTE");
    assert_eq!(body["filter"]["age"]["value"], json!(["18"]));
    assert_eq!(body["fields"], json!({"cars": ["brand", "id"], "users": ["id", "name"]}));
    assert_eq!(body["page"]["page_number"], 2);
    assert_eq!(body["page"]["page_size"], 10);
    assert_eq!(
        body["page"]["sort"],
        json!([
            {"attribute": "name", "order": "ascending"},
            {"attribute": "age", "order": "descending"}
        ])
    );
}

#[tokio::test]
async fn test_defaults_without_query() {
    let server = TestServer::new(setup_test_app(None)).unwrap();

    let response = server.get("/api/v1/users").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["filter"], json!({}));
    assert_eq!(body["fields"], json!({}));
    assert_eq!(body["page"], json!({"page_number": 0, "page_size": 25, "sort": []}));
}

#[tokio::test]
async fn test_json_literal_value_not_split() {
    let server = TestServer::new(setup_test_app(None)).unwrap();

    let url = format!(
        "/api/v1/users?{}",
        query(&[("filter[meta]", r#"{"a":1,"b":2}"#)])
    );
    let body: Value = server.get(&url).await.json();
    assert_eq!(body["filter"]["meta"]["value"], json!([r#"{"a":1,"b":2}"#]));
    assert_eq!(body["filter"]["meta"]["operator"], "EQ");
}

#[tokio::test]
async fn test_arity_violation_returns_error_document() {
    let server = TestServer::new(setup_test_app(None)).unwrap();

    let url = format!("/api/v1/users?{}", query(&[("filter[name]", "a,b")]));
    let response = server.get(&url).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.header(header::CONTENT_TYPE),
        "application/vnd.api+json"
    );

    let body: Value = response.json();
    assert!(body.get("data").is_none());
    assert_eq!(body["errors"][0]["status"], 400);
    assert_eq!(body["errors"][0]["code"], "INVALID_FILTER");
    assert_eq!(
        body["errors"][0]["detail"],
        "Could not prepare filter! For operator: EQ array values not permitted!"
    );
    assert_eq!(body["meta"]["api"]["version"], "1");
}

#[tokio::test]
async fn test_malformed_filter_key_names_parameter() {
    let server = TestServer::new(setup_test_app(None)).unwrap();

    let url = format!("/api/v1/users?{}", query(&[("filter[a][eq][x]", "1")]));
    let response = server.get(&url).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["errors"][0]["code"], "INVALID_PARAMETER");
    assert_eq!(body["errors"][0]["source"]["parameter"], "filter[a][eq][x]");
}

#[tokio::test]
async fn test_empty_fieldset_type_is_bad_request() {
    let server = TestServer::new(setup_test_app(None)).unwrap();

    let url = format!("/api/v1/users?{}", query(&[("fields[]", "id")]));
    let response = server.get(&url).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["errors"][0]["source"]["parameter"], "fields[]");
}

#[tokio::test]
async fn test_non_numeric_page_is_bad_request() {
    let server = TestServer::new(setup_test_app(None)).unwrap();

    let url = format!("/api/v1/users?{}", query(&[("page[size]", "ten")]));
    let response = server.get(&url).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["errors"][0]["source"]["parameter"], "page[size]");
}

#[tokio::test]
async fn test_configured_parameter_names() {
    let config = JsonApiConfig::from_yaml_str(
        r#"
page:
  default_size: 5
params:
  filter: where
  sort: order
"#,
    )
    .unwrap();
    let server = TestServer::new(setup_test_app(Some(config))).unwrap();

    let url = format!(
        "/api/v1/users?{}",
        query(&[("where[id]", "7"), ("filter[id]", "8"), ("order", "-id")])
    );
    let body: Value = server.get(&url).await.json();

    assert_eq!(body["filter"]["id"]["value"], json!(["7"]));
    assert_eq!(body["page"]["page_size"], 5);
    assert_eq!(body["page"]["sort"][0]["order"], "descending");
}
