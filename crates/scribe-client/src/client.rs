use reqwest::header::HeaderName;
use reqwest::multipart::{Form, Part};
use url::Url;

use crate::error::{ClientError, Result};
use crate::types::{AudioInput, ErrorBody, KeyStatus, SaveApiKey, Transcription};

/// Header the relay expects on state-changing requests by default
pub const DEFAULT_CSRF_HEADER: &str = "X-Scribe-CSRF-Protection";

/// Typed client for the Scribe transcription relay
///
/// The relay keeps the credential in an HTTP-only cookie, so the client
/// carries its own cookie store and never sees the stored value again
/// after saving it.
#[derive(Debug, Clone)]
pub struct ScribeClient {
    base_url: Url,
    http: reqwest::Client,
    csrf_header: Option<HeaderName>,
    api_key: Option<String>,
}

impl ScribeClient {
    /// Create a new client pointing at the given base URL
    ///
    /// Endpoint paths are appended to the base URL's path, so a relay mounted
    /// under `/app/` is addressed as `https://host/app/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be
    /// built
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL: {e}")))?;

        let http = reqwest::Client::builder().cookie_store(true).build()?;

        Ok(Self {
            base_url,
            http,
            csrf_header: Some(HeaderName::from_static("x-scribe-csrf-protection")),
            api_key: None,
        })
    }

    /// Use a different CSRF header name, or none at all
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a valid header name
    pub fn with_csrf_header(mut self, name: Option<&str>) -> Result<Self> {
        self.csrf_header = name
            .map(|n| {
                HeaderName::try_from(n)
                    .map_err(|e| ClientError::Config(format!("invalid CSRF header '{n}': {e}")))
            })
            .transpose()?;
        Ok(self)
    }

    /// Send this key with every transcription instead of relying on the
    /// stored cookie
    #[must_use]
    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Get the base URL
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Ask the relay whether a credential is stored
    pub async fn has_api_key(&self) -> Result<bool> {
        let url = make_url(&self.base_url, "/api/check-api-key");
        let response = self.request(reqwest::Method::GET, &url).send().await?;
        let status: KeyStatus = handle_error(response).await?.json().await?;

        Ok(status.has_key)
    }

    /// Store a credential; an empty key clears it
    pub async fn save_api_key(&self, api_key: &str) -> Result<()> {
        let url = make_url(&self.base_url, "/api/api-key");
        let response = self
            .request(reqwest::Method::POST, &url)
            .json(&SaveApiKey { api_key })
            .send()
            .await?;
        handle_error(response).await?;

        tracing::debug!(cleared = api_key.is_empty(), "credential saved");
        Ok(())
    }

    /// Remove the stored credential
    pub async fn disconnect(&self) -> Result<()> {
        let url = make_url(&self.base_url, "/api/api-key");
        let response = self.request(reqwest::Method::DELETE, &url).send().await?;
        handle_error(response).await?;

        tracing::debug!("credential cleared");
        Ok(())
    }

    /// Transcribe an uploaded file or a remote URL
    pub async fn transcribe(&self, input: &AudioInput) -> Result<Transcription> {
        let url = make_url(&self.base_url, "/api/transcribe");

        let mut form = match input {
            AudioInput::File {
                bytes,
                file_name,
                mime_type,
            } => {
                let part = Part::bytes(bytes.to_vec())
                    .file_name(file_name.clone())
                    .mime_str(mime_type)
                    .map_err(|e| ClientError::Config(format!("invalid mime type: {e}")))?;
                Form::new().part("file", part)
            }
            AudioInput::Url(audio_url) => Form::new().text("audioUrl", audio_url.clone()),
        };

        if let Some(ref key) = self.api_key {
            form = form.text("apiKey", key.clone());
        }

        let response = self
            .request(reqwest::Method::POST, &url)
            .multipart(form)
            .send()
            .await?;

        let transcription: Transcription = handle_error(response).await?.json().await?;
        if transcription.transcript.is_empty() {
            return Err(ClientError::Parse("relay returned an empty transcript".to_owned()));
        }

        Ok(transcription)
    }

    fn request(&self, method: reqwest::Method, url: &Url) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, url.as_str());

        if let Some(ref header) = self.csrf_header {
            builder = builder.header(header.clone(), "1");
        }

        builder
    }
}

/// Append an endpoint path to the base URL's own path
fn make_url(base_url: &Url, path: &str) -> Url {
    let mut url = base_url.clone();
    let prefix = base_url.path().trim_end_matches('/');
    url.set_path(&format!("{prefix}{path}"));
    url
}

/// Check an HTTP response for errors
async fn handle_error(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let (code, message) = parse_error_body(&body);

    Err(ClientError::Api {
        status: status.as_u16(),
        code,
        message,
    })
}

/// Parse an error response body into (code, message)
fn parse_error_body(body: &str) -> (Option<String>, String) {
    serde_json::from_str::<ErrorBody>(body)
        .map_or_else(|_| (None, body.to_owned()), |e| (e.code, e.error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_error_body_is_parsed() {
        let (code, message) =
            parse_error_body(r#"{"error":"API key is required","code":"missing_credential"}"#);
        assert_eq!(code.as_deref(), Some("missing_credential"));
        assert_eq!(message, "API key is required");
    }

    #[test]
    fn plain_error_body_is_kept_verbatim() {
        let (code, message) = parse_error_body("Bad Gateway");
        assert_eq!(code, None);
        assert_eq!(message, "Bad Gateway");
    }

    #[test]
    fn urls_keep_the_base_path() {
        let base = Url::parse("http://localhost:3000/app/").unwrap();
        assert_eq!(
            make_url(&base, "/api/transcribe").as_str(),
            "http://localhost:3000/app/api/transcribe"
        );

        let base = Url::parse("http://localhost:3000/app").unwrap();
        assert_eq!(
            make_url(&base, "/api/api-key").as_str(),
            "http://localhost:3000/app/api/api-key"
        );
    }

    #[test]
    fn root_base_url_maps_to_root_paths() {
        let base = Url::parse("http://localhost:3000").unwrap();
        assert_eq!(
            make_url(&base, "/api/check-api-key").as_str(),
            "http://localhost:3000/api/check-api-key"
        );
    }

    #[test]
    fn rejects_bad_base_url() {
        assert!(matches!(
            ScribeClient::new("not a url"),
            Err(ClientError::Config(_))
        ));
    }

    #[test]
    fn csrf_header_can_be_changed_or_dropped() {
        let client = ScribeClient::new("http://localhost:3000").unwrap();
        assert_eq!(
            client.csrf_header.as_ref().map(HeaderName::as_str),
            Some("x-scribe-csrf-protection")
        );
        assert!(DEFAULT_CSRF_HEADER.eq_ignore_ascii_case("x-scribe-csrf-protection"));

        let client = client.with_csrf_header(None).unwrap();
        assert!(client.csrf_header.is_none());

        let err = ScribeClient::new("http://localhost:3000")
            .unwrap()
            .with_csrf_header(Some("bad header"))
            .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
