// covenant_server/src/web/handlers/shop_handlers.rs

use actix_web::{web, HttpResponse};
use covenant::models::PublicPaymentMethod;
use covenant::{resolve_order, resolve_registration, ContextData, WorkflowOutcome};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::pipelines::contexts::{OrderCtxData, OrderSubmission};
use crate::state::AppState;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackRequestPayload {
  pub registration_code: String,
  pub order_number: String,
}

#[instrument(name = "handler::list_items", skip(app_state))]
pub async fn list_items_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let items = app_state.stores.items.list().await?;
  Ok(HttpResponse::Ok().json(items))
}

#[instrument(name = "handler::place_order", skip(app_state, req_payload))]
pub async fn place_order_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<OrderSubmission>,
) -> Result<HttpResponse, AppError> {
  let ctx_data = ContextData::new(OrderCtxData::new(app_state.get_ref().clone(), req_payload.into_inner()));

  match app_state.workflows.run(ctx_data.clone()).await? {
    WorkflowOutcome::Completed => {
      let final_ctx = ctx_data.read();
      let order = final_ctx.order.as_ref().ok_or_else(|| {
        warn!("Order workflow completed without a stored order.");
        AppError::Internal("Order completed without a record.".to_string())
      })?;

      info!(
        order_number = %order.order_number,
        confirmation_sent = final_ctx.confirmation_sent,
        "Order placed."
      );
      Ok(HttpResponse::Created().json(json!({
        "message": "Order placed successfully.",
        "orderNumber": order.order_number,
        "status": order.status,
        "confirmationEmailSent": final_ctx.confirmation_sent,
      })))
    }
    WorkflowOutcome::Halted => {
      warn!("Order workflow was halted by a step.");
      Err(AppError::Internal("Order placement was halted by an internal step.".to_string()))
    }
  }
}

/// Looks an order up by registration code and order number together.
#[instrument(name = "handler::track_order", skip(app_state, req_payload))]
pub async fn track_order_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<TrackRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  if payload.registration_code.trim().is_empty() || payload.order_number.trim().is_empty() {
    return Err(AppError::validation("Registration code and order number are required."));
  }

  let registration = resolve_registration(app_state.stores.registrations.as_ref(), &payload.registration_code).await?;
  let details = resolve_order(app_state.stores.orders.as_ref(), registration.id, &payload.order_number).await?;
  Ok(HttpResponse::Ok().json(details))
}

#[instrument(name = "handler::list_payment_methods", skip(app_state))]
pub async fn list_payment_methods_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let methods: Vec<PublicPaymentMethod> = app_state
    .stores
    .payment_methods
    .list_active()
    .await?
    .into_iter()
    .map(PublicPaymentMethod::from)
    .collect();
  Ok(HttpResponse::Ok().json(json!({ "paymentMethods": methods })))
}
