use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{
    de::{DeserializeOwned, Error as _},
    ser::{Error as _, SerializeStruct},
    Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::Value;
use uuid::Uuid;

use super::resource::JsonApiResource;

pub const JSON_API_CONTENT_TYPE: &str = "application/vnd.api+json";

/// Top-level JSON:API document. `data` and `errors` are never both present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned + JsonApiResource"))]
pub struct ResponseDocument<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PrimaryData<T>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorObject>>,
    #[serde(default)]
    pub meta: Meta,
}

impl<T> ResponseDocument<T> {
    pub fn is_error(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }

    /// Status of the first error, 200 for success documents.
    pub fn status_code(&self) -> StatusCode {
        self.errors
            .as_ref()
            .and_then(|errors| errors.first())
            .map(ErrorObject::status_code)
            .unwrap_or(StatusCode::OK)
    }

    /// The single resource object, if this document carries one.
    pub fn single(&self) -> Option<&ResourceObject<T>> {
        match &self.data {
            Some(PrimaryData::Single(resource)) => Some(resource),
            _ => None,
        }
    }

    /// The resource collection, if this document carries one.
    pub fn collection(&self) -> Option<&[ResourceObject<T>]> {
        match &self.data {
            Some(PrimaryData::Collection(resources)) => Some(resources),
            _ => None,
        }
    }
}

impl<T: Serialize> IntoResponse for ResponseDocument<T> {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match serde_json::to_vec(&self) {
            Ok(body) => (
                status,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(JSON_API_CONTENT_TYPE),
                )],
                body,
            )
                .into_response(),
            Err(err) => {
                tracing::error!("Failed to serialize response document: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, bound(deserialize = "T: DeserializeOwned + JsonApiResource"))]
pub enum PrimaryData<T> {
    Collection(Vec<ResourceObject<T>>),
    Single(ResourceObject<T>),
}

/// One resource wrapped as `{type, id, attributes, links}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceObject<T> {
    pub resource_type: String,
    pub id: String,
    pub attributes: T,
    pub links: Links,
    /// Attribute left out of `attributes` on output since it already is `id`.
    pub identity_field: Option<&'static str>,
}

#[derive(Deserialize)]
struct WireResourceObject {
    #[serde(rename = "type")]
    resource_type: String,
    id: String,
    attributes: Value,
    links: Links,
}

/// Deserialize `attributes`, putting `id` back under the identity field when
/// the wire form left it out.
///
/// The id is first offered as a string, then as JSON (so numeric identities
/// read back as numbers). Returns the identity field only when it was restored.
fn restore_identity<T: DeserializeOwned>(
    attributes: Value,
    identity_field: Option<&'static str>,
    id: &str,
) -> serde_json::Result<(T, Option<&'static str>)> {
    let field = match identity_field {
        Some(field) if attributes.as_object().is_some_and(|map| !map.contains_key(field)) => field,
        _ => return serde_json::from_value(attributes).map(|value| (value, None)),
    };

    let with_id = |id_value: Value| {
        let mut attributes = attributes.clone();
        if let Value::Object(map) = &mut attributes {
            map.insert(field.to_string(), id_value);
        }
        serde_json::from_value::<T>(attributes)
    };

    match with_id(Value::String(id.to_string())) {
        Ok(value) => Ok((value, Some(field))),
        Err(err) => match serde_json::from_str::<Value>(id) {
            Ok(typed_id) => with_id(typed_id).map(|value| (value, Some(field))),
            Err(_) => Err(err),
        },
    }
}

impl<'de, T> Deserialize<'de> for ResourceObject<T>
where
    T: DeserializeOwned + JsonApiResource,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireResourceObject::deserialize(deserializer)?;
        let (attributes, identity_field) =
            restore_identity::<T>(wire.attributes, T::identity_field(), &wire.id)
                .map_err(D::Error::custom)?;

        Ok(ResourceObject {
            resource_type: wire.resource_type,
            id: wire.id,
            attributes,
            links: wire.links,
            identity_field,
        })
    }
}

impl<T: Serialize> Serialize for ResourceObject<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ResourceObject", 4)?;
        state.serialize_field("type", &self.resource_type)?;
        state.serialize_field("id", &self.id)?;
        match self.identity_field {
            Some(field) => {
                let mut attributes = serde_json::to_value(&self.attributes).map_err(S::Error::custom)?;
                if let Value::Object(map) = &mut attributes {
                    map.remove(field);
                }
                state.serialize_field("attributes", &attributes)?;
            }
            None => state.serialize_field("attributes", &self.attributes)?,
        }
        state.serialize_field("links", &self.links)?;
        state.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default)]
    pub api: ApiMeta,
    #[serde(default)]
    pub page: PageMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_socket: Option<WebSocketMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<TraceMeta>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMeta {
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(default)]
    pub max_size: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSocketMeta {
    pub session_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceMeta {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<ErrorLinks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl ErrorObject {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            code: None,
            detail: detail.into(),
            source: None,
            links: None,
            meta: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_source_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.source = Some(ErrorSource {
            parameter: parameter.into(),
        });
        self
    }

    pub fn with_links(mut self, about: impl Into<String>, error_type: impl Into<String>) -> Self {
        self.links = Some(ErrorLinks {
            about: about.into(),
            error_type: error_type.into(),
        });
        self
    }

    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSource {
    pub parameter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLinks {
    pub about: String,
    #[serde(rename = "type")]
    pub error_type: String,
}
