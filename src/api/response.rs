//! JSON envelope shared by every endpoint and the mapping from [`Error`] to HTTP
//! responses.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Body of every JSON response: `code` is 0 on success and the HTTP status otherwise.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// 0 on success, HTTP status on failure
    pub code: u16,
    /// "success" or the error description
    pub message: String,
    /// Payload; omitted on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wraps `data` in a successful envelope.
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            code: 0,
            message: "success".to_string(),
            data: Some(data),
        })
    }
}

/// Plain acknowledgement returned by delete endpoints.
#[derive(Debug, Serialize)]
pub struct Deleted {
    /// Human-readable confirmation
    pub message: &'static str,
    /// Id of the removed record
    pub id: i64,
}

impl Error {
    const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidState { .. } | Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!(error = %self, "Request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ApiResponse::<()> {
            code: status.as_u16(),
            message,
            data: None,
        };
        (status, Json(body)).into_response()
    }
}
