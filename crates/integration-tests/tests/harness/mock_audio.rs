//! Static audio host for remote URL tests

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::{Router, routing};
use tokio_util::sync::CancellationToken;

/// Bytes served at `/clip.mp3`
pub const CLIP: &[u8] = b"ID3\x03\x00fake-mp3-frames";

pub struct MockAudioHost {
    addr: SocketAddr,
    shutdown: CancellationToken,
    hits: Arc<AtomicU32>,
}

impl MockAudioHost {
    /// Serves `/clip.mp3` and `/clip.wav`, 404 elsewhere
    pub async fn start() -> anyhow::Result<Self> {
        let hits = Arc::new(AtomicU32::new(0));

        let app = Router::new()
            .route(
                "/clip.mp3",
                routing::get(|State(hits): State<Arc<AtomicU32>>| async move {
                    hits.fetch_add(1, Ordering::Relaxed);
                    ([(header::CONTENT_TYPE, "audio/mpeg")], CLIP)
                }),
            )
            .route(
                "/clip.wav",
                routing::get(|State(hits): State<Arc<AtomicU32>>| async move {
                    hits.fetch_add(1, Ordering::Relaxed);
                    ([(header::CONTENT_TYPE, "audio/wav")], CLIP)
                }),
            )
            .fallback(|| async { StatusCode::NOT_FOUND.into_response() })
            .with_state(Arc::clone(&hits));

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

        Ok(Self { addr, shutdown, hits })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::Relaxed)
    }
}

impl Drop for MockAudioHost {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
