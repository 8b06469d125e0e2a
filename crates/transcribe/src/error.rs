use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TranscribeError>;

/// Transcription relay errors with appropriate HTTP status codes
#[derive(Debug, Error)]
pub enum TranscribeError {
    /// No credential in the form or the credential cookie
    #[error("API key is required")]
    MissingCredential,

    /// Neither or both of `file` and `audioUrl` were supplied
    #[error("Exactly one of file or audio URL is required")]
    MissingAudioSource,

    /// Malformed multipart payload
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The remote audio could not be retrieved
    #[error("Failed to fetch audio from URL: {0}")]
    RemoteFetchFailed(String),

    /// The provider answered without any text
    #[error("Failed to generate transcription")]
    EmptyTranscription,

    /// The provider call failed
    #[error("Provider error: {message}")]
    ProviderError { status: Option<u16>, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl TranscribeError {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingCredential | Self::MissingAudioSource | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::RemoteFetchFailed(_) | Self::EmptyTranscription | Self::ProviderError { .. } | Self::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Machine-readable failure category
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::MissingAudioSource => "missing_audio_source",
            Self::InvalidRequest(_) => "invalid_request",
            Self::RemoteFetchFailed(_) => "remote_fetch_failed",
            Self::EmptyTranscription => "empty_transcription",
            Self::ProviderError { .. } => "provider_error",
            Self::ConfigError(_) => "internal_error",
        }
    }

    /// Message that is safe to expose to API consumers
    ///
    /// Fetch and provider details stay in the server log.
    pub fn client_message(&self) -> String {
        match self {
            Self::RemoteFetchFailed(_) => "Failed to fetch audio from URL".to_string(),
            Self::ProviderError { .. } => "Failed to process audio".to_string(),
            Self::ConfigError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Failure body: `{"error": "...", "code": "..."}`
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

impl IntoResponse for TranscribeError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(%status, error = %self, "transcription failed");
        } else {
            tracing::debug!(%status, error = %self, "transcription request rejected");
        }

        let body = ErrorResponse {
            error: self.client_message(),
            code: self.code(),
        };

        (status, Json(body)).into_response()
    }
}
