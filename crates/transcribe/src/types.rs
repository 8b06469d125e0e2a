use base64::{Engine, engine::general_purpose::STANDARD};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TranscribeError};

/// MIME type assumed for an uploaded part that declares none
pub const UPLOAD_FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Where the audio to transcribe comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// Bytes uploaded with the request
    FileUpload {
        bytes: Vec<u8>,
        mime_type: String,
        file_name: Option<String>,
    },
    /// Audio hosted elsewhere
    RemoteReference { url: String },
}

impl AudioSource {
    /// Build a source from the optional form fields
    ///
    /// Exactly one of `file` and `url` must be present. An upload with no
    /// bytes and a blank URL both count as absent.
    pub fn from_parts(file: Option<UploadedFile>, url: Option<String>) -> Result<Self> {
        let file = file.filter(|f| !f.bytes.is_empty());
        let url = url.map(|u| u.trim().to_owned()).filter(|u| !u.is_empty());

        match (file, url) {
            (Some(file), None) => Ok(Self::FileUpload {
                mime_type: file
                    .mime_type
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| UPLOAD_FALLBACK_MIME_TYPE.to_owned()),
                bytes: file.bytes,
                file_name: file.file_name,
            }),
            (None, Some(url)) => Ok(Self::RemoteReference { url }),
            _ => Err(TranscribeError::MissingAudioSource),
        }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FileUpload { .. } => "file",
            Self::RemoteReference { .. } => "url",
        }
    }
}

/// The `file` part of a transcription form
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
    pub file_name: Option<String>,
}

/// A validated transcription request
#[derive(Debug)]
pub struct TranscriptionRequest {
    /// Provider API key
    pub credential: SecretString,
    /// Audio to transcribe
    pub source: AudioSource,
}

/// Audio ready for the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAudio {
    pub mime_type: String,
    /// Standard base64 with padding
    pub data: String,
}

impl EncodedAudio {
    pub fn encode(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }
}

/// Successful transcription body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    pub transcript: String,
}
