// covenant_server/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::handlers::extractors::AdminSession;

#[derive(Deserialize, Debug)]
pub struct SigninRequestPayload {
  pub username: String,
  pub password: String,
}

#[instrument(
    name = "handler::signin",
    skip(app_state, req_payload),
    fields(req_username = %req_payload.username)
)]
pub async fn signin_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SigninRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  if !app_state.auth_policy.authenticate(&payload.username, &payload.password)? {
    warn!("Admin sign-in rejected.");
    return Err(AppError::unauthorized("Invalid username or password."));
  }

  let session = app_state.sessions.issue(&payload.username);
  info!("Admin signed in.");
  Ok(HttpResponse::Ok().json(json!({
    "message": "Signin successful.",
    "token": session.token,
    "username": session.username,
    "expiresAt": session.expires_at,
  })))
}

#[instrument(name = "handler::signout", skip_all, fields(username = %session.0.username))]
pub async fn signout_handler(app_state: web::Data<AppState>, session: AdminSession) -> Result<HttpResponse, AppError> {
  app_state.sessions.revoke(&session.0.token);
  info!("Admin signed out.");
  Ok(HttpResponse::Ok().json(json!({ "message": "Signed out." })))
}
