#![allow(clippy::must_use_candidate)]

pub mod cors;
pub mod credential;
pub mod csrf;
mod duration;
mod env;
pub mod health;
mod loader;
pub mod server;
pub mod telemetry;
pub mod transcription;

use serde::Deserialize;

pub use cors::*;
pub use credential::*;
pub use csrf::*;
pub use health::*;
pub use server::*;
pub use telemetry::*;
pub use transcription::*;

/// Top-level Scribe configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Credential cookie configuration
    #[serde(default)]
    pub credential: CredentialConfig,
    /// Transcription relay configuration
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
