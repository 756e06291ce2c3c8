//! Per-request context for the access log line written in `main`.

use actix_web::dev::ServiceRequest;
use actix_web::http::header;
use actix_web::{HttpMessage, HttpRequest};
use uuid::Uuid;

/// Stored in request extensions once the bearer token resolves to an actor.
#[derive(Debug, Clone, Copy)]
pub struct ActorId(pub Uuid);

pub fn actor_id_of(req: &HttpRequest) -> String {
    req.extensions()
        .get::<ActorId>()
        .map(|actor| actor.0.to_string())
        .unwrap_or_else(|| "anonymous".to_string())
}

/// Honors forwarding headers only when actix is configured to trust them.
pub fn client_ip(req: &ServiceRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn user_agent(req: &ServiceRequest) -> String {
    req.headers()
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

pub fn status_class(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "unknown",
    }
}
