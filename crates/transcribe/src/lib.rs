#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod error;
pub mod fetch;
mod http_client;
mod protocol;
mod provider;
mod request;
mod server;
mod types;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    routing::post,
};
use scribe_credential::CredentialStore;

pub use error::{Result, TranscribeError};
pub use fetch::{FetchedAudio, RemoteAudioFetcher};
pub use provider::TranscriptionProvider;
pub use request::ExtractTranscription;
pub use server::{Server, TranscribeServerBuilder};
pub use types::{AudioSource, EncodedAudio, TranscriptionRequest, TranscriptionResponse, UploadedFile};

/// Build the transcription relay from configuration
///
/// # Errors
///
/// Returns an error if the relay fails to initialize
pub fn build_server(config: &scribe_config::Config, credentials: Arc<CredentialStore>) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        TranscribeServerBuilder::new(config, credentials)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize transcription relay: {e}"))?,
    );
    Ok(server)
}

/// Create the endpoint router for transcription
///
/// The upload limit is enforced by the extractor from configuration, so
/// axum's default body limit is lifted on this route.
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new().route("/api/transcribe", post(transcribe).layer(DefaultBodyLimit::disable()))
}

/// Handle transcription requests
async fn transcribe(
    State(server): State<Arc<Server>>,
    ExtractTranscription(request): ExtractTranscription,
) -> Result<Json<TranscriptionResponse>> {
    let source = request.source.kind();

    tracing::debug!(source, "transcription handler called");

    let response = server.transcribe(request).await?;

    tracing::info!(source, chars = response.transcript.chars().count(), "transcription complete");

    Ok(Json(response))
}
