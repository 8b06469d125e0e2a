use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if a cookie, provider, or fetch setting is unusable
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_credential_config()?;
        self.validate_transcription_config()?;
        self.validate_server_config()?;
        Ok(())
    }

    fn validate_credential_config(&self) -> anyhow::Result<()> {
        let name = &self.credential.cookie_name;

        if name.is_empty() {
            anyhow::bail!("credential.cookie_name must not be empty");
        }

        if !name.bytes().all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)) {
            anyhow::bail!("credential.cookie_name '{name}' is not a valid cookie name");
        }

        if self.credential.max_age.is_zero() {
            anyhow::bail!("credential.max_age must be greater than 0");
        }

        Ok(())
    }

    fn validate_transcription_config(&self) -> anyhow::Result<()> {
        let transcription = &self.transcription;

        if transcription.max_upload_bytes == 0 {
            anyhow::bail!("transcription.max_upload_bytes must be greater than 0");
        }

        if transcription.provider.model.trim().is_empty() {
            anyhow::bail!("transcription.provider.model must not be empty");
        }

        if let Some(ref base_url) = transcription.provider.base_url
            && !matches!(base_url.scheme(), "http" | "https")
        {
            anyhow::bail!("transcription.provider.base_url must use http or https, got '{base_url}'");
        }

        let fetch = &transcription.fetch;

        if fetch.max_bytes == 0 {
            anyhow::bail!("transcription.fetch.max_bytes must be greater than 0");
        }

        if fetch.timeout.is_zero() {
            anyhow::bail!("transcription.fetch.timeout must be greater than 0");
        }

        http::HeaderValue::from_str(&fetch.default_content_type).map_err(|e| {
            anyhow::anyhow!(
                "transcription.fetch.default_content_type '{}' is invalid: {e}",
                fetch.default_content_type
            )
        })?;

        Ok(())
    }

    fn validate_server_config(&self) -> anyhow::Result<()> {
        if self.server.health.enabled && !self.server.health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/'");
        }

        if let Some(ref csrf) = self.server.csrf
            && csrf.enabled
        {
            http::HeaderName::try_from(csrf.header_name.as_str())
                .map_err(|e| anyhow::anyhow!("server.csrf.header_name '{}' is invalid: {e}", csrf.header_name))?;
        }

        if !self.server.environment.is_production() {
            tracing::debug!("credential cookie will be sent without the Secure attribute");
        }

        Ok(())
    }
}
