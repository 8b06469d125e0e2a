use http::header::CONTENT_TYPE;
use reqwest::{Client, redirect::Policy};
use scribe_config::FetchConfig;
use url::Url;

use crate::error::{Result, TranscribeError};

/// Audio retrieved from a remote URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedAudio {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Retrieves audio the caller referenced by URL
///
/// One GET per call, no retries. Only `http` and `https` URLs are accepted,
/// and both the total time and the body size are bounded.
#[derive(Debug, Clone)]
pub struct RemoteAudioFetcher {
    client: Client,
    default_content_type: String,
    max_bytes: usize,
}

impl RemoteAudioFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| TranscribeError::ConfigError(format!("failed to build fetch client: {e}")))?;

        Ok(Self {
            client,
            default_content_type: config.default_content_type.clone(),
            max_bytes: config.max_bytes,
        })
    }

    /// Download the audio at `raw_url`
    pub async fn fetch(&self, raw_url: &str) -> Result<FetchedAudio> {
        let url = Url::parse(raw_url).map_err(|e| TranscribeError::RemoteFetchFailed(format!("invalid URL: {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(TranscribeError::RemoteFetchFailed(format!(
                "unsupported URL scheme '{}'",
                url.scheme()
            )));
        }

        tracing::debug!(host = url.host_str().unwrap_or_default(), "fetching remote audio");

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| TranscribeError::RemoteFetchFailed(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranscribeError::RemoteFetchFailed(format!("{url} returned {status}")));
        }

        if let Some(length) = response.content_length()
            && length > self.max_bytes as u64
        {
            return Err(self.too_large(&url));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map_or_else(|| self.default_content_type.clone(), str::to_owned);

        let mut bytes = Vec::new();

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| TranscribeError::RemoteFetchFailed(format!("reading body from {url} failed: {e}")))?
        {
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(self.too_large(&url));
            }
            bytes.extend_from_slice(&chunk);
        }

        tracing::debug!(bytes = bytes.len(), %content_type, "remote audio fetched");

        Ok(FetchedAudio { bytes, content_type })
    }

    fn too_large(&self, url: &Url) -> TranscribeError {
        TranscribeError::RemoteFetchFailed(format!("{url} exceeds the {} byte limit", self.max_bytes))
    }
}
