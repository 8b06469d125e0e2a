pub(crate) mod gemini;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::types::EncodedAudio;

/// Trait for transcription provider implementations
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Transcribe audio to text using the caller's credential
    ///
    /// An empty string is a valid return value; the relay decides what an
    /// empty transcript means.
    async fn transcribe(&self, audio: EncodedAudio, credential: &SecretString) -> crate::error::Result<String>;

    /// Get the provider name
    fn name(&self) -> &str;
}
