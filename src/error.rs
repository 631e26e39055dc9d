use std::collections::BTreeMap;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::QueryRejection;
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

/// Error returned by every handler.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] pantry_shared::Error),

    /// Malformed request the extractors or decoders refused.
    #[error("{0}")]
    BadRequest(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Domain(pantry_shared::Error::Unknown(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

fn field_errors(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|error| match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("Invalid value ({}).", error.code),
                })
                .collect();

            (field.to_string(), messages)
        })
        .collect()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        use pantry_shared::Error;

        let (status, body) = match self {
            AppError::BadRequest(detail) => (StatusCode::BAD_REQUEST, json!({ "detail": detail })),
            AppError::Domain(Error::Validate(errors)) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "detail": "Invalid input.",
                    "errors": field_errors(&errors),
                }),
            ),
            AppError::Domain(Error::User(detail)) => {
                (StatusCode::BAD_REQUEST, json!({ "detail": detail }))
            }
            AppError::Domain(Error::NotFound(resource)) => (
                StatusCode::NOT_FOUND,
                json!({ "detail": format!("{resource} not found") }),
            ),
            AppError::Domain(Error::Forbidden) => (
                StatusCode::FORBIDDEN,
                json!({ "detail": "You do not have permission to perform this action." }),
            ),
            AppError::Domain(err @ Error::Unauthenticated) => (
                StatusCode::UNAUTHORIZED,
                json!({ "detail": err.to_string() }),
            ),
            AppError::Domain(Error::Server(cause)) => {
                tracing::error!("Server error: {cause}");
                internal()
            }
            AppError::Domain(Error::Unknown(cause)) => {
                tracing::error!("Unexpected error: {cause:?}");
                internal()
            }
        };

        (status, Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, serde_json::Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "detail": "An unexpected error occurred. Please try again later." }),
    )
}
