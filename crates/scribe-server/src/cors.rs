use http::Method;
use http::header::HeaderName;
use scribe_config::{AnyOrArray, CorsConfig};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Build a Tower CORS layer from configuration
///
/// Browsers refuse wildcards together with credentials, so when the
/// credential cookie is allowed cross-origin, wildcard entries mirror the
/// request instead.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new();

    layer = match (&config.origins, config.credentials) {
        (AnyOrArray::Any, false) => layer.allow_origin(AllowOrigin::any()),
        (AnyOrArray::Any, true) => layer.allow_origin(AllowOrigin::mirror_request()),
        (AnyOrArray::List(origins), _) => layer.allow_origin(parse_all::<http::HeaderValue>(origins)),
    };

    layer = match (&config.methods, config.credentials) {
        (AnyOrArray::Any, false) => layer.allow_methods(AllowMethods::any()),
        (AnyOrArray::Any, true) => layer.allow_methods(AllowMethods::mirror_request()),
        (AnyOrArray::List(methods), _) => layer.allow_methods(parse_all::<Method>(methods)),
    };

    layer = match (&config.headers, config.credentials) {
        (AnyOrArray::Any, false) => layer.allow_headers(AllowHeaders::any()),
        (AnyOrArray::Any, true) => layer.allow_headers(AllowHeaders::mirror_request()),
        (AnyOrArray::List(headers), _) => layer.allow_headers(parse_all::<HeaderName>(headers)),
    };

    if config.credentials {
        layer = layer.allow_credentials(true);
    }

    if let Some(duration) = config.max_age_duration() {
        layer = layer.max_age(duration);
    }

    layer
}

/// Parse every value, dropping the ones that are not valid
fn parse_all<T: std::str::FromStr>(values: &[String]) -> Vec<T> {
    values
        .iter()
        .filter_map(|value| {
            let parsed = value.parse().ok();
            if parsed.is_none() {
                tracing::warn!(%value, "ignoring invalid CORS entry");
            }
            parsed
        })
        .collect()
}
