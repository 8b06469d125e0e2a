use std::time::Duration;

use serde::Deserialize;
use url::Url;

/// 32 MiB
const DEFAULT_BODY_LIMIT: usize = 32 << 20;

/// Top-level transcription relay configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranscriptionConfig {
    /// Largest accepted multipart request body in bytes
    #[serde(default = "default_body_limit")]
    pub max_upload_bytes: usize,
    /// Upstream transcription provider
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Remote audio retrieval
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_BODY_LIMIT,
            provider: ProviderConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

/// Configuration for the upstream transcription provider
///
/// The provider is addressed with the caller's own credential, so no API
/// key lives in the configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Provider type
    #[serde(rename = "type", default)]
    pub provider_type: ProviderType,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,
    /// Instruction text placed ahead of the audio
    #[serde(default = "default_instruction")]
    pub instruction: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: ProviderType::default(),
            base_url: None,
            model: default_model(),
            instruction: default_instruction(),
        }
    }
}

/// Supported transcription providers
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    /// Google Gemini `generateContent`
    #[default]
    Gemini,
}

/// Remote audio retrieval limits
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FetchConfig {
    /// Content type assumed when the remote server omits one
    #[serde(default = "default_content_type")]
    pub default_content_type: String,
    /// Total time allowed for a single retrieval
    #[serde(default = "default_timeout", deserialize_with = "crate::duration::deserialize")]
    pub timeout: Duration,
    /// Largest accepted remote body in bytes
    #[serde(default = "default_body_limit")]
    pub max_bytes: usize,
    /// Redirect hops followed before giving up
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            default_content_type: default_content_type(),
            timeout: default_timeout(),
            max_bytes: DEFAULT_BODY_LIMIT,
            max_redirects: default_max_redirects(),
        }
    }
}

const fn default_body_limit() -> usize {
    DEFAULT_BODY_LIMIT
}

fn default_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_instruction() -> String {
    "Transcribe the following audio file accurately:".to_string()
}

fn default_content_type() -> String {
    "audio/mpeg".to_string()
}

const fn default_timeout() -> Duration {
    Duration::from_secs(60)
}

const fn default_max_redirects() -> usize {
    5
}
