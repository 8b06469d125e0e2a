use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CredentialError>;

/// Credential write errors
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The request body could not be read
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The key contains bytes that cannot be carried in a cookie
    #[error("API key contains characters that cannot be stored")]
    UnstorableKey,
}

impl CredentialError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::UnstorableKey => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for CredentialError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        tracing::debug!(%status, error = %self, "rejecting credential write");

        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}
