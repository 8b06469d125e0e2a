use serde::Deserialize;

/// Header that state-changing requests must carry when CSRF protection is on
pub const DEFAULT_CSRF_HEADER: &str = "X-Scribe-CSRF-Protection";

/// CSRF protection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CsrfConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_header_name")]
    pub header_name: String,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            header_name: default_header_name(),
        }
    }
}

const fn default_enabled() -> bool {
    true
}

fn default_header_name() -> String {
    DEFAULT_CSRF_HEADER.to_string()
}
