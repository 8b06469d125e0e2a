//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use scribe_config::{Config, CorsConfig, CsrfConfig, Environment, HealthConfig, ServerConfig};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig {
                        enabled: true,
                        ..HealthConfig::default()
                    },
                    ..ServerConfig::default()
                },
                ..Config::default()
            },
        }
    }

    /// Point the Gemini provider at a mock backend
    pub fn with_gemini(mut self, base_url: &str) -> Self {
        self.config.transcription.provider.base_url = Some(base_url.parse().expect("valid URL"));
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Set CSRF configuration
    pub fn with_csrf(mut self, config: CsrfConfig) -> Self {
        self.config.server.csrf = Some(config);
        self
    }

    /// Mark the deployment as production (secure cookies)
    pub fn production(mut self) -> Self {
        self.config.server.environment = Environment::Production;
        self
    }

    /// Cap the accepted request body size
    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.config.transcription.max_upload_bytes = limit;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
