//! Cross-origin policy.
//!
//! Allowed: the exact origins from config, plus any `https://<sub>.<domain>`
//! under the trusted hosting domain. All methods and headers are allowed for
//! those origins; credentials are not.

use axum::http::HeaderValue;
use axum::http::request::Parts;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::CorsConfig;

pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let config = config.clone();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .is_ok_and(|origin| is_allowed_origin(&config, origin))
            },
        ))
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_credentials(false)
}

pub fn is_allowed_origin(config: &CorsConfig, origin: &str) -> bool {
    config.allowed_origins.iter().any(|allowed| allowed == origin)
        || config
            .trusted_domain
            .as_deref()
            .is_some_and(|domain| is_https_subdomain(origin, domain))
}

fn is_https_subdomain(origin: &str, domain: &str) -> bool {
    let Some(host) = origin.strip_prefix("https://") else {
        return false;
    };
    let Some(sub) = host
        .strip_suffix(domain)
        .and_then(|rest| rest.strip_suffix('.'))
    else {
        return false;
    };

    !sub.is_empty()
        && sub
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
}
