use std::net::SocketAddr;

use serde::Deserialize;

use crate::{cors::CorsConfig, csrf::CsrfConfig, health::HealthConfig};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub listen_address: Option<SocketAddr>,
    /// Deployment environment, controls the `Secure` cookie attribute
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub cors: Option<CorsConfig>,
    #[serde(default)]
    pub csrf: Option<CsrfConfig>,
}

/// Deployment environment
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Local development over plain HTTP
    #[default]
    Development,
    /// Production deployment behind TLS
    Production,
}

impl Environment {
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}
