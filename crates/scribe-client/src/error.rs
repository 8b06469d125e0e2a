/// Client-specific result type
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors from the Scribe client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Relay returned an error response
    #[error("{status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Failure code reported by the relay, if any
        code: Option<String>,
        /// Human-readable error message
        message: String,
    },

    /// Failed to parse response
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Invalid configuration or input
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A submission is already running
    #[error("a transcription is already in progress")]
    SubmissionInFlight,

    /// Copying to the clipboard failed
    #[error("clipboard error: {0}")]
    Clipboard(String),
}

/// What went wrong, as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    MissingCredential,
    MissingAudioSource,
    RemoteFetchFailed,
    EmptyTranscription,
    ProviderError,
    ClipboardFailure,
    /// The relay could not be reached
    Network,
    Other,
}

impl ClientError {
    pub fn category(&self) -> FailureCategory {
        match self {
            Self::Http(_) => FailureCategory::Network,
            Self::Api { code, status, .. } => match code.as_deref() {
                Some("missing_credential") => FailureCategory::MissingCredential,
                Some("missing_audio_source") => FailureCategory::MissingAudioSource,
                Some("remote_fetch_failed") => FailureCategory::RemoteFetchFailed,
                Some("empty_transcription") => FailureCategory::EmptyTranscription,
                Some("provider_error") => FailureCategory::ProviderError,
                _ if *status >= 500 => FailureCategory::ProviderError,
                _ => FailureCategory::Other,
            },
            Self::Clipboard(_) => FailureCategory::ClipboardFailure,
            Self::Parse(_) | Self::Config(_) | Self::SubmissionInFlight => FailureCategory::Other,
        }
    }
}
