use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// MIME type sent when a file's extension is not recognised
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Audio chosen for a submission
///
/// A submission carries exactly one source, so the choice between a local
/// file and a remote URL is made when the value is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioInput {
    File {
        bytes: Bytes,
        file_name: String,
        mime_type: String,
    },
    Url(String),
}

impl AudioInput {
    /// Audio held in memory
    pub fn file(bytes: impl Into<Bytes>, file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_type_for(&file_name).to_owned();

        Self::File {
            bytes: bytes.into(),
            file_name,
            mime_type,
        }
    }

    /// Audio hosted elsewhere, fetched by the relay
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// Read a local audio file
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ClientError::Config(format!("failed to read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map_or_else(|| "audio".to_owned(), |n| n.to_string_lossy().into_owned());

        Ok(Self::file(bytes, file_name))
    }

    /// Override the MIME type guessed from the file name
    #[must_use]
    pub fn with_mime_type(self, mime: impl Into<String>) -> Self {
        match self {
            Self::File {
                bytes, file_name, ..
            } => Self::File {
                bytes,
                file_name,
                mime_type: mime.into(),
            },
            url @ Self::Url(_) => url,
        }
    }
}

/// Guess an audio MIME type from a file extension
pub fn mime_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("m4a" | "mp4") => "audio/mp4",
        Some("ogg" | "oga") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("webm") => "audio/webm",
        Some("aac") => "audio/aac",
        _ => FALLBACK_MIME_TYPE,
    }
}

/// Whether a credential is stored
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyStatus {
    pub has_key: bool,
}

/// Body of a credential save
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SaveApiKey<'a> {
    pub api_key: &'a str,
}

/// Successful relay response
#[derive(Debug, Clone, Deserialize)]
pub struct Transcription {
    pub transcript: String,
}

/// Relay error body
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
    #[serde(default)]
    pub code: Option<String>,
}
