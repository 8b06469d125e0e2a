use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::header::HeaderName;
use http::{Method, StatusCode};

/// CSRF protection middleware
///
/// State-changing requests must carry the configured header. Its value is
/// ignored: plain HTML form posts cannot set custom headers.
pub async fn csrf_middleware(header_name: HeaderName, request: Request, next: Next) -> Response {
    if matches!(*request.method(), Method::GET | Method::HEAD | Method::OPTIONS) {
        return next.run(request).await;
    }

    if request.headers().contains_key(&header_name) {
        return next.run(request).await;
    }

    tracing::debug!(method = %request.method(), path = request.uri().path(), "missing CSRF header");

    (
        StatusCode::FORBIDDEN,
        axum::Json(serde_json::json!({ "error": format!("missing CSRF header: {header_name}") })),
    )
        .into_response()
}
