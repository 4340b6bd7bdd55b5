//! Error types for castplay
//!
//! Request-level errors become `{"status":"error","message":...}` responses,
//! HTTP 500 unless the request body itself was refused (e.g. 413 when it is
//! over the size limit). Nothing escapes to the listening server.

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use castplay_common::api::PlayResponse;
use thiserror::Error;
use tracing::error;

/// Main error type for the castplay service
#[derive(Error, Debug)]
pub enum Error {
    /// Errors from the shared library (configuration, request decoding)
    #[error(transparent)]
    Common(#[from] castplay_common::Error),

    /// Request body could not be read
    #[error("Failed to read request body: {}", .0.body_text())]
    Body(#[from] BytesRejection),

    /// HTTP server errors (bind, serve)
    #[error("HTTP server error: {0}")]
    Http(String),
}

/// Convenience Result type using the castplay Error
pub type Result<T> = std::result::Result<T, Error>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Body(rejection) => rejection.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = self.to_string();
        error!("Request failed: {}", message);
        (
            status,
            Json(PlayResponse::error(message)),
        )
            .into_response()
    }
}
