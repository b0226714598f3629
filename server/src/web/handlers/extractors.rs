// covenant_server/src/web/handlers/extractors.rs

use crate::errors::AppError;
use crate::services::auth_service::AdminSessionInfo;
use crate::state::AppState;
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::warn;

/// A live admin session, taken from `Authorization: Bearer <token>`.
/// Handlers that take this argument reject the request with 401 otherwise.
#[derive(Debug, Clone)]
pub struct AdminSession(pub AdminSessionInfo);

pub(crate) fn bearer_token(req: &HttpRequest) -> Option<String> {
  let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
  let token = value.strip_prefix("Bearer ").or_else(|| value.strip_prefix("bearer "))?;
  let token = token.trim();
  (!token.is_empty()).then(|| token.to_string())
}

impl FromRequest for AdminSession {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
      return ready(Err(AppError::Internal("Application state is not configured.".to_string())));
    };
    let Some(token) = bearer_token(req) else {
      warn!("Admin route called without a bearer token.");
      return ready(Err(AppError::unauthorized("Admin session required.")));
    };
    match state.sessions.validate(&token) {
      Some(session) => ready(Ok(AdminSession(session))),
      None => {
        warn!("Admin route called with an unknown or expired session.");
        ready(Err(AppError::unauthorized("Admin session is invalid or has expired.")))
      }
    }
  }
}
