use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

/// Error kinds surfaced by the registry API. Every failure leaving a
/// handler is one of these; the HTTP status is derived from the kind.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    BadParameter(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl RegistryError {
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryError::Unauthorized(_) => "unauthorized_error",
            RegistryError::BadParameter(_) => "bad_parameter_error",
            RegistryError::NotFound(_) => "not_found_error",
            RegistryError::Internal(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RegistryError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            RegistryError::BadParameter(_) => StatusCode::BAD_REQUEST,
            RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
            RegistryError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for RegistryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RegistryError::NotFound("record not found".to_string()),
            other => RegistryError::Internal(other.into()),
        }
    }
}
