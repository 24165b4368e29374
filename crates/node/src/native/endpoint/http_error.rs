//! Mapping from node errors to http responses.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use floodkv_rpc::types::ErrorResponse;

use crate::error::Error;

/// Request failures surfaced to the http caller. None of these ever
/// terminate the serving loop.
#[derive(Debug)]
pub enum HttpError {
    /// The request was missing or carried an invalid field.
    BadRequest(String),
    /// The key is absent locally, or the flood exhausted its budget and
    /// peers.
    NotFound(String),
    /// Anything else.
    Internal(String),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            HttpError::BadRequest(e) => (StatusCode::BAD_REQUEST, e),
            HttpError::NotFound(e) => (StatusCode::NOT_FOUND, e),
            HttpError::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, e),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<Error> for HttpError {
    fn from(e: Error) -> Self {
        match e {
            Error::KeyNotFound(_) => HttpError::NotFound(e.to_string()),
            Error::EmptyKey | Error::EmptyEndpoint => HttpError::BadRequest(e.to_string()),
            _ => HttpError::Internal(e.to_string()),
        }
    }
}
