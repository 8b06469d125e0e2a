use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Scribe audio transcription relay
#[derive(Debug, Parser)]
#[command(name = "scribe", about = "Relay audio files and URLs to a transcription provider")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "scribe.toml", env = "SCRIBE_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "SCRIBE_LISTEN")]
    pub listen: Option<SocketAddr>,
}
