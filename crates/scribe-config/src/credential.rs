use std::time::Duration;

use serde::Deserialize;

/// Default cookie holding the provider API key
pub const DEFAULT_COOKIE_NAME: &str = "gemini-api-key";

/// 30 days
const DEFAULT_MAX_AGE: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Credential cookie configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialConfig {
    /// Cookie name
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Lifetime of the cookie from the moment it is written
    #[serde(default = "default_max_age", deserialize_with = "crate::duration::deserialize")]
    pub max_age: Duration,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            max_age: DEFAULT_MAX_AGE,
        }
    }
}

fn default_cookie_name() -> String {
    DEFAULT_COOKIE_NAME.to_string()
}

const fn default_max_age() -> Duration {
    DEFAULT_MAX_AGE
}
