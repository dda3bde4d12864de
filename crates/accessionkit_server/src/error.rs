//! HTTP error mapping.

use accessionkit_catalog::CatalogError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, warn};

/// Request failure as seen by the client.
///
/// Client-caused failures carry their detail; server-side failures carry only
/// a short fixed message and the detail goes to the log.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(&'static str),
}

impl ApiError {
    /// Map a catalog failure, using `message` for server-side failures.
    pub fn from_catalog(err: CatalogError, message: &'static str) -> Self {
        match err {
            CatalogError::InvalidPayload(_) => {
                warn!(error = %err, "request rejected");
                Self::BadRequest(err.to_string())
            }
            other => {
                error!(error = %other, "{message}");
                Self::Internal(message)
            }
        }
    }

    pub fn internal(message: &'static str, detail: impl std::fmt::Display) -> Self {
        error!(error = %detail, "{message}");
        Self::Internal(message)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::BadRequest(message) => message,
            Self::Internal(message) => message.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
