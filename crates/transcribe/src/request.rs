use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequest, Multipart},
};
use axum_extra::extract::CookieJar;
use secrecy::SecretString;

use crate::{
    error::TranscribeError,
    server::Server,
    types::{AudioSource, TranscriptionRequest, UploadedFile},
};

/// Extractor for the multipart transcription form
///
/// Fields: `apiKey` (falls back to the credential cookie), and exactly one
/// of `file` or `audioUrl`. Unknown fields are ignored.
pub struct ExtractTranscription(pub TranscriptionRequest);

impl FromRequest<Arc<Server>> for ExtractTranscription {
    type Rejection = TranscribeError;

    async fn from_request(request: http::Request<Body>, server: &Arc<Server>) -> Result<Self, Self::Rejection> {
        let (parts, body) = request.into_parts();

        let content_type = parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("multipart/form-data") {
            return Err(TranscribeError::InvalidRequest(
                "expected 'Content-Type: multipart/form-data'".to_string(),
            ));
        }

        let jar = CookieJar::from_headers(&parts.headers);

        let bytes = axum::body::to_bytes(body, server.max_upload_bytes())
            .await
            .map_err(|e| TranscribeError::InvalidRequest(format!("failed to read request body: {e}")))?;

        let request = http::Request::from_parts(parts, Body::from(bytes));

        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| TranscribeError::InvalidRequest(format!("failed to parse multipart form: {e}")))?;

        let mut api_key: Option<String> = None;
        let mut file: Option<UploadedFile> = None;
        let mut audio_url: Option<String> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| TranscribeError::InvalidRequest(format!("failed to read multipart field: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_owned();

            match name.as_str() {
                "apiKey" => api_key = Some(read_text(field, "apiKey").await?),
                "audioUrl" => audio_url = Some(read_text(field, "audioUrl").await?),
                "file" => {
                    let mime_type = field.content_type().map(str::to_owned);
                    let file_name = field.file_name().map(str::to_owned);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| TranscribeError::InvalidRequest(format!("failed to read file field: {e}")))?;

                    file = Some(UploadedFile {
                        bytes: bytes.to_vec(),
                        mime_type,
                        file_name,
                    });
                }
                _ => tracing::trace!(field = %name, "ignoring unknown form field"),
            }
        }

        let credential = api_key
            .filter(|key| !key.is_empty())
            .map(SecretString::from)
            .or_else(|| server.credentials().read(&jar))
            .ok_or(TranscribeError::MissingCredential)?;

        let source = AudioSource::from_parts(file, audio_url)?;

        Ok(Self(TranscriptionRequest { credential, source }))
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>, name: &str) -> Result<String, TranscribeError> {
    field
        .text()
        .await
        .map_err(|e| TranscribeError::InvalidRequest(format!("failed to read {name} field: {e}")))
}
