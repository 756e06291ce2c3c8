use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use actix_web::{
    dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpMessage, HttpRequest,
};
use tracing::debug;

use crate::config::AuthConfig;
use crate::domain::Actor;
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::ActorRepository;
use crate::middleware::request_logging::ActorId;
use crate::utils::jwt::validate_token;

/// The actor behind the request's bearer token, freshly loaded from the store.
#[derive(Debug, Clone)]
pub struct AuthenticatedActor(pub Actor);

impl AuthenticatedActor {
    pub fn actor(&self) -> &Actor {
        &self.0
    }
}

fn bearer_token(req: &HttpRequest) -> AppResult<String> {
    let header = req.headers().get(AUTHORIZATION).ok_or(AppError::Unauthorized)?;
    let value = header.to_str().map_err(|_| AppError::Unauthorized)?;
    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AppError::Unauthorized),
    }
}

impl FromRequest for AuthenticatedActor {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = AppResult<Self>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let token = bearer_token(&req)?;

            let auth_config = req.app_data::<web::Data<AuthConfig>>().ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!("missing AuthConfig app data"))
            })?;
            let actor_repo = req
                .app_data::<web::Data<Arc<dyn ActorRepository>>>()
                .ok_or_else(|| {
                    AppError::InternalError(anyhow::anyhow!("missing ActorRepository app data"))
                })?;

            let claims = validate_token(&token, auth_config.get_ref())?;
            let actor = actor_repo.find_by_id(claims.sub).await?.ok_or_else(|| {
                debug!(actor = %claims.sub, "token subject has no actor row");
                AppError::Unauthorized
            })?;

            req.extensions_mut().insert(ActorId(actor.id));
            Ok(AuthenticatedActor(actor))
        })
    }
}
