#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod store;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

pub use error::{CredentialError, Result};
pub use store::CredentialStore;

/// Build the credential store from configuration
pub fn build_store(config: &scribe_config::Config) -> Arc<CredentialStore> {
    Arc::new(CredentialStore::new(&config.credential, config.server.environment))
}

/// Create the endpoint router for credential status and writes
pub fn endpoint_router() -> Router<Arc<CredentialStore>> {
    Router::new()
        .route("/api/check-api-key", get(check_api_key))
        .route("/api/api-key", axum::routing::post(save_api_key).delete(clear_api_key))
}

/// Presence of a stored credential, never its value
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyStatus {
    pub has_key: bool,
}

/// Body of a credential write
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveApiKey {
    api_key: String,
}

async fn check_api_key(State(store): State<Arc<CredentialStore>>, jar: CookieJar) -> Json<KeyStatus> {
    Json(KeyStatus {
        has_key: store.exists(&jar),
    })
}

async fn save_api_key(
    State(store): State<Arc<CredentialStore>>,
    jar: CookieJar,
    body: std::result::Result<Json<SaveApiKey>, JsonRejection>,
) -> Result<(CookieJar, StatusCode)> {
    let Json(SaveApiKey { api_key }) = body.map_err(|e| CredentialError::InvalidRequest(e.body_text()))?;

    let jar = store.save(jar, &api_key)?;

    if api_key.is_empty() {
        tracing::info!("credential cleared");
    } else {
        tracing::info!("credential saved");
    }

    Ok((jar, StatusCode::NO_CONTENT))
}

async fn clear_api_key(State(store): State<Arc<CredentialStore>>, jar: CookieJar) -> (CookieJar, StatusCode) {
    tracing::info!("credential cleared");

    (store.clear(jar), StatusCode::NO_CONTENT)
}
