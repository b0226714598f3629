// covenant_server/src/web/handlers/registration_handlers.rs

use actix_web::{web, HttpResponse};
use covenant::{ContextData, WorkflowOutcome};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::pipelines::contexts::{RegistrationCtxData, RegistrationSubmission};
use crate::state::AppState;

#[instrument(name = "handler::register", skip(app_state, req_payload))]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<RegistrationSubmission>,
) -> Result<HttpResponse, AppError> {
  let ctx_data = ContextData::new(RegistrationCtxData::new(
    app_state.get_ref().clone(),
    req_payload.into_inner(),
  ));

  match app_state.workflows.run(ctx_data.clone()).await? {
    WorkflowOutcome::Completed => {
      let final_ctx = ctx_data.read();
      let registration = final_ctx.registration.as_ref().ok_or_else(|| {
        warn!("Registration workflow completed without a stored record.");
        AppError::Internal("Registration completed without a record.".to_string())
      })?;

      info!(
        registration_id = %registration.id,
        admin_notified = final_ctx.admin_notified,
        welcome_sent = final_ctx.welcome_sent,
        "Registration submitted."
      );
      Ok(HttpResponse::Created().json(json!({
        "message": "Registration received.",
        "id": registration.id,
        "uniqueCode": registration.unique_code,
        "welcomeEmailSent": final_ctx.welcome_sent,
      })))
    }
    WorkflowOutcome::Halted => {
      warn!("Registration workflow was halted by a step.");
      Err(AppError::Internal("Registration was halted by an internal step.".to_string()))
    }
  }
}
