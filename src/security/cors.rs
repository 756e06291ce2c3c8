use actix_cors::Cors;
use actix_web::http::header;

use crate::config::SecurityConfig;

/// Only the configured admin front-ends may call the API from a browser.
pub fn cors_middleware(config: &SecurityConfig) -> Cors {
    let allowlist = config.cors_allowed_origins.clone();

    Cors::default()
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .expose_headers(vec![header::CONTENT_DISPOSITION])
        .allowed_origin_fn(move |origin, _| {
            origin
                .to_str()
                .ok()
                .map(|value| allowlist.iter().any(|allowed| allowed == value))
                .unwrap_or(false)
        })
        .max_age(3600)
}
