use crate::models::UnsupportedAlgorithm;
use crate::utils::hash::DigestError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Message returned for every failure the caller cannot fix.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error during hashing.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No file part in the request")]
    MissingFile,

    #[error("No selected file")]
    EmptyFilename,

    #[error(transparent)]
    UnsupportedAlgorithm(#[from] UnsupportedAlgorithm),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(String),

    #[error("Digest error: {0}")]
    Digest(#[from] DigestError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingFile
            | AppError::EmptyFilename
            | AppError::UnsupportedAlgorithm(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Digest(_) | AppError::Io(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!("Unexpected failure while hashing: {:?}", self);
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            match self {
                AppError::BadRequest(msg) | AppError::PayloadTooLarge(msg) => msg,
                other => other.to_string(),
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
