use std::sync::Arc;

use scribe_config::ProviderType;
use scribe_credential::CredentialStore;

use crate::{
    error::{Result, TranscribeError},
    fetch::RemoteAudioFetcher,
    provider::{TranscriptionProvider, gemini::GeminiProvider},
    types::{AudioSource, EncodedAudio, TranscriptionRequest, TranscriptionResponse},
};

/// Stateless relay between callers and the transcription provider
pub struct Server {
    provider: Box<dyn TranscriptionProvider>,
    fetcher: RemoteAudioFetcher,
    credentials: Arc<CredentialStore>,
    max_upload_bytes: usize,
}

impl Server {
    /// Transcribe the request's audio
    ///
    /// Remote audio is fetched first; the provider is only called once the
    /// audio is in hand. No retries.
    pub async fn transcribe(&self, request: TranscriptionRequest) -> Result<TranscriptionResponse> {
        let TranscriptionRequest { credential, source } = request;

        let audio = match source {
            AudioSource::FileUpload {
                bytes,
                mime_type,
                file_name,
            } => {
                tracing::debug!(
                    file_name = file_name.as_deref().unwrap_or_default(),
                    bytes = bytes.len(),
                    %mime_type,
                    "transcribing uploaded audio"
                );
                EncodedAudio::encode(mime_type, &bytes)
            }
            AudioSource::RemoteReference { url } => {
                let fetched = self.fetcher.fetch(&url).await?;
                EncodedAudio::encode(fetched.content_type, &fetched.bytes)
            }
        };

        let transcript = self.provider.transcribe(audio, &credential).await?;

        if transcript.trim().is_empty() {
            return Err(TranscribeError::EmptyTranscription);
        }

        Ok(TranscriptionResponse { transcript })
    }

    pub(crate) fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub(crate) const fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}

/// Builder for constructing the relay from configuration
pub struct TranscribeServerBuilder<'a> {
    config: &'a scribe_config::Config,
    credentials: Arc<CredentialStore>,
    provider: Option<Box<dyn TranscriptionProvider>>,
}

impl<'a> TranscribeServerBuilder<'a> {
    pub fn new(config: &'a scribe_config::Config, credentials: Arc<CredentialStore>) -> Self {
        Self {
            config,
            credentials,
            provider: None,
        }
    }

    /// Use a specific provider instead of the configured one
    #[must_use]
    pub fn provider(mut self, provider: Box<dyn TranscriptionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn build(self) -> Result<Server> {
        let transcription = &self.config.transcription;

        let provider = self.provider.unwrap_or_else(|| match transcription.provider.provider_type {
            ProviderType::Gemini => Box::new(GeminiProvider::new(&transcription.provider)),
        });

        tracing::debug!(
            provider = provider.name(),
            model = %transcription.provider.model,
            "transcription relay initialized"
        );

        Ok(Server {
            provider,
            fetcher: RemoteAudioFetcher::new(&transcription.fetch)?,
            credentials: self.credentials,
            max_upload_bytes: transcription.max_upload_bytes,
        })
    }
}
