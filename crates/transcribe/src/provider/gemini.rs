use async_trait::async_trait;
use reqwest::Client;
use scribe_config::ProviderConfig;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::TranscriptionProvider;
use crate::{
    error::{Result, TranscribeError},
    http_client::http_client,
    protocol::{Content, ErrorResponse, GenerateContentRequest, GenerateContentResponse, InlineData, RequestPart},
    types::EncodedAudio,
};

/// Default Generative Language API base URL
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Header carrying the API key, keeps it out of request URLs and access logs
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini `generateContent` transcription provider
pub(crate) struct GeminiProvider {
    client: Client,
    base_url: String,
    model: String,
    instruction: String,
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        let base_url = config
            .base_url
            .as_ref()
            .map_or(DEFAULT_BASE_URL, Url::as_str)
            .trim_end_matches('/')
            .to_owned();

        Self {
            client: http_client(),
            base_url,
            model: config.model.clone(),
            instruction: config.instruction.clone(),
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_request(&self, audio: EncodedAudio) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_owned()),
                parts: vec![
                    RequestPart::Text(self.instruction.clone()),
                    RequestPart::InlineData(InlineData {
                        mime_type: audio.mime_type,
                        data: audio.data,
                    }),
                ],
            }],
        }
    }
}

#[async_trait]
impl TranscriptionProvider for GeminiProvider {
    async fn transcribe(&self, audio: EncodedAudio, credential: &SecretString) -> Result<String> {
        tracing::debug!(
            model = %self.model,
            mime_type = %audio.mime_type,
            encoded_bytes = audio.data.len(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(self.generate_url())
            .header(API_KEY_HEADER, credential.expose_secret())
            .json(&self.build_request(audio))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(provider = "gemini", error = %e, "upstream request failed");
                TranscribeError::ProviderError {
                    status: None,
                    message: format!("Failed to send request to Gemini: {e}"),
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map_or(body, |e| format!("{} {}: {}", e.error.code, e.error.status, e.error.message));

            tracing::error!(provider = "gemini", %status, %message, "upstream returned error");

            return Err(TranscribeError::ProviderError {
                status: Some(status.as_u16()),
                message,
            });
        }

        let result: GenerateContentResponse = response.json().await.map_err(|e| {
            tracing::error!(provider = "gemini", error = %e, "failed to parse upstream response");
            TranscribeError::ProviderError {
                status: Some(status.as_u16()),
                message: format!("Failed to parse Gemini response: {e}"),
            }
        })?;

        let finish_reason = result
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            .unwrap_or("none");

        tracing::debug!(provider = "gemini", finish_reason, "generateContent complete");

        Ok(result.text().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
