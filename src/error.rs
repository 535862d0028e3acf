use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use crate::response::{ResponseBuilder, ResponseDocument};

#[derive(Debug)]
pub enum AppError {
    /// Query key breaks the bracket grammar, a required segment is empty or a
    /// value cannot be read as the requested type.
    MalformedParameter { parameter: String, detail: String },
    /// Non-list operator was given more than one value.
    InvalidFilterOperator { operator: String },
    /// URI template placeholder count differs from the supplied arguments.
    TemplateMismatch {
        template: String,
        placeholders: usize,
        arguments: usize,
    },
    /// Resource type or identity cannot be determined from the resource model.
    Configuration(String),
    Serialization(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MalformedParameter { parameter, detail } => {
                write!(f, "Malformed parameter {}: {}", parameter, detail)
            }
            AppError::InvalidFilterOperator { operator } => write!(
                f,
                "Could not prepare filter! For operator: {} array values not permitted!",
                operator
            ),
            AppError::TemplateMismatch {
                template,
                placeholders,
                arguments,
            } => write!(
                f,
                "Could not replace placeholders in uri: {} because number of args different ({} placeholders, {} args)",
                template, placeholders, arguments
            ),
            AppError::Configuration(e) => write!(f, "Configuration error: {}", e),
            AppError::Serialization(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err)
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn malformed(parameter: impl Into<String>, detail: impl Into<String>) -> Self {
        AppError::MalformedParameter {
            parameter: parameter.into(),
            detail: detail.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MalformedParameter { .. } | AppError::InvalidFilterOperator { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::TemplateMismatch { .. }
            | AppError::Configuration(_)
            | AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Application error code carried in the error object.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MalformedParameter { .. } => "INVALID_PARAMETER",
            AppError::InvalidFilterOperator { .. } => "INVALID_FILTER",
            AppError::TemplateMismatch { .. } => "INVALID_URI_TEMPLATE",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Render the error through the regular response builder so that request
    /// errors and server faults share one document shape.
    pub fn to_response(&self) -> (StatusCode, ResponseDocument<serde_json::Value>) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let builder = match self {
            AppError::MalformedParameter { parameter, detail } => {
                ResponseBuilder::<serde_json::Value>::new().push_error(
                    crate::response::ErrorObject::new(status, detail.clone())
                        .with_code(self.code())
                        .with_source_parameter(parameter.clone()),
                )
            }
            _ => ResponseBuilder::<serde_json::Value>::new().error_with_code(
                status,
                self.code(),
                self.to_string(),
            ),
        };

        (status, builder.build())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, document) = self.to_response();
        (status, document).into_response()
    }
}
