//! Mock Gemini backend for integration tests
//!
//! Answers `generateContent` with a canned reply and records what it was sent

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// Canned reply for every request
#[derive(Clone)]
pub enum Reply {
    Transcript(String),
    /// A candidate with no text, as returned for blocked content
    NoText,
    Error { status: u16, message: String },
}

/// Request as the mock received it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub action: String,
    pub api_key: Option<String>,
    pub body: serde_json::Value,
}

pub struct MockGemini {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    calls: AtomicU32,
    reply: Reply,
    last: Mutex<Option<Recorded>>,
    /// When set, replies wait for a notification
    gate: Option<Arc<Notify>>,
}

impl MockGemini {
    /// Start a mock that transcribes everything as `text`
    pub async fn start(text: &str) -> anyhow::Result<Self> {
        Self::start_with(Reply::Transcript(text.to_owned()), None).await
    }

    /// Start a mock with an arbitrary reply
    pub async fn start_with(reply: Reply, gate: Option<Arc<Notify>>) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            calls: AtomicU32::new(0),
            reply,
            last: Mutex::new(None),
            gate,
        });

        let app = Router::new()
            .route("/v1beta/models/{action}", routing::post(handle_generate))
            .layer(DefaultBodyLimit::disable())
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL to configure as the provider endpoint
    pub fn base_url(&self) -> String {
        format!("http://{}/v1beta", self.addr)
    }

    /// Number of `generateContent` calls received
    pub fn calls(&self) -> u32 {
        self.state.calls.load(Ordering::Relaxed)
    }

    /// The most recent request
    pub fn last_request(&self) -> Option<Recorded> {
        self.state.last.lock().unwrap().clone()
    }
}

impl Drop for MockGemini {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_generate(
    State(state): State<Arc<MockState>>,
    Path(action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    state.calls.fetch_add(1, Ordering::Relaxed);
    *state.last.lock().unwrap() = Some(Recorded {
        action,
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body,
    });

    if let Some(ref gate) = state.gate {
        gate.notified().await;
    }

    match &state.reply {
        Reply::Transcript(text) => Json(serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        }))
        .into_response(),
        Reply::NoText => Json(serde_json::json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        }))
        .into_response(),
        Reply::Error { status, message } => (
            StatusCode::from_u16(*status).unwrap(),
            Json(serde_json::json!({
                "error": { "code": status, "message": message, "status": "INVALID_ARGUMENT" }
            })),
        )
            .into_response(),
    }
}
