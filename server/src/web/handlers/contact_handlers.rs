// covenant_server/src/web/handlers/contact_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{instrument, warn};

use crate::errors::AppError;
use crate::services::templates;
use crate::state::AppState;

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct ContactRequestPayload {
  pub name: String,
  pub email: String,
  pub subject: String,
  pub message: String,
}

/// Forwards a contact-form message to the admin mailbox. A failed delivery is
/// logged and the visitor still gets a success response.
#[instrument(name = "handler::contact", skip(app_state, req_payload))]
pub async fn contact_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<ContactRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let fields = [&payload.name, &payload.email, &payload.subject, &payload.message];
  if fields.iter().any(|value| value.trim().is_empty()) {
    return Err(AppError::validation("All fields are required."));
  }

  let rendered = templates::contact_notice(&payload.name, &payload.email, &payload.subject, &payload.message);
  let report = app_state
    .mailer
    .send(&app_state.config.admin_email, &rendered.subject, &rendered.html)
    .await;
  if !report.success {
    warn!(error = ?report.error, "Contact notice could not be delivered.");
  }

  Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Your message has been sent." })))
}
