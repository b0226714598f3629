// covenant_server/src/web/handlers/admin_handlers.rs

//! Back-office endpoints. Every handler takes an [`AdminSession`], so a
//! request without a live session is turned away with 401 before it runs.

use actix_web::{web, HttpResponse};
use covenant::models::{NewItem, NewPaymentMethod, OrderStatus, PaymentMethodPatch, RegistrationStatus};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::templates;
use crate::state::AppState;
use crate::web::handlers::extractors::AdminSession;

#[derive(Deserialize, Debug)]
pub struct RegistrationStatusPayload {
  pub status: RegistrationStatus,
}

#[derive(Deserialize, Debug)]
pub struct OrderStatusPayload {
  pub status: OrderStatus,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminMessagePayload {
  pub to: String,
  pub subject: String,
  pub message: String,
  pub applicant_name: String,
}

// --- Registrations ---

#[instrument(name = "handler::admin::list_registrations", skip_all)]
pub async fn list_registrations_handler(
  app_state: web::Data<AppState>,
  _session: AdminSession,
) -> Result<HttpResponse, AppError> {
  let registrations = app_state.stores.registrations.list().await?;
  Ok(HttpResponse::Ok().json(registrations))
}

#[instrument(name = "handler::admin::update_registration_status", skip(app_state, _session, req_payload))]
pub async fn update_registration_status_handler(
  app_state: web::Data<AppState>,
  _session: AdminSession,
  registration_id: web::Path<Uuid>,
  req_payload: web::Json<RegistrationStatusPayload>,
) -> Result<HttpResponse, AppError> {
  let id = registration_id.into_inner();
  let updated = app_state
    .stores
    .registrations
    .update_status(id, req_payload.status)
    .await?
    .ok_or_else(|| AppError::not_found("Registration not found."))?;
  info!(registration_id = %id, status = ?updated.status, "Registration status updated.");
  Ok(HttpResponse::Ok().json(updated))
}

// --- Items ---

#[instrument(name = "handler::admin::list_items", skip_all)]
pub async fn list_items_handler(
  app_state: web::Data<AppState>,
  _session: AdminSession,
) -> Result<HttpResponse, AppError> {
  let items = app_state.stores.items.list().await?;
  Ok(HttpResponse::Ok().json(items))
}

#[instrument(name = "handler::admin::create_item", skip_all)]
pub async fn create_item_handler(
  app_state: web::Data<AppState>,
  _session: AdminSession,
  req_payload: web::Json<NewItem>,
) -> Result<HttpResponse, AppError> {
  let new = req_payload.into_inner();
  if new.name.trim().is_empty() || new.description.trim().is_empty() {
    return Err(AppError::validation("Item name and description are required."));
  }
  if new.price_cents < 0 {
    return Err(AppError::validation("Item price cannot be negative."));
  }

  let item = app_state.stores.items.create(new).await?;
  info!(item_id = %item.id, "Item added to catalog.");
  Ok(HttpResponse::Created().json(item))
}

#[instrument(name = "handler::admin::delete_item", skip(app_state, _session))]
pub async fn delete_item_handler(
  app_state: web::Data<AppState>,
  _session: AdminSession,
  item_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  if !app_state.stores.items.delete(item_id.into_inner()).await? {
    return Err(AppError::not_found("Item not found."));
  }
  Ok(HttpResponse::Ok().json(json!({ "message": "Item deleted." })))
}

// --- Orders ---

#[instrument(name = "handler::admin::list_orders", skip_all)]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  _session: AdminSession,
) -> Result<HttpResponse, AppError> {
  let orders = app_state.stores.orders.list_details().await?;
  Ok(HttpResponse::Ok().json(orders))
}

#[instrument(name = "handler::admin::update_order_status", skip(app_state, _session, req_payload))]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  _session: AdminSession,
  order_id: web::Path<Uuid>,
  req_payload: web::Json<OrderStatusPayload>,
) -> Result<HttpResponse, AppError> {
  let id = order_id.into_inner();
  let updated = app_state
    .stores
    .orders
    .update_status(id, req_payload.status)
    .await?
    .ok_or_else(|| AppError::not_found("Order not found."))?;
  info!(order_number = %updated.order_number, status = ?updated.status, "Order status updated.");
  Ok(HttpResponse::Ok().json(updated))
}

// --- Payment methods ---

#[instrument(name = "handler::admin::list_payment_methods", skip_all)]
pub async fn list_payment_methods_handler(
  app_state: web::Data<AppState>,
  _session: AdminSession,
) -> Result<HttpResponse, AppError> {
  let methods = app_state.stores.payment_methods.list_all().await?;
  Ok(HttpResponse::Ok().json(methods))
}

#[instrument(name = "handler::admin::create_payment_method", skip_all)]
pub async fn create_payment_method_handler(
  app_state: web::Data<AppState>,
  _session: AdminSession,
  req_payload: web::Json<NewPaymentMethod>,
) -> Result<HttpResponse, AppError> {
  let new = req_payload.into_inner();
  if new.name.trim().is_empty() {
    return Err(AppError::validation("Payment method name is required."));
  }
  let method = app_state.stores.payment_methods.create(new).await?;
  Ok(HttpResponse::Created().json(method))
}

#[instrument(name = "handler::admin::update_payment_method", skip(app_state, _session, req_payload))]
pub async fn update_payment_method_handler(
  app_state: web::Data<AppState>,
  _session: AdminSession,
  method_id: web::Path<Uuid>,
  req_payload: web::Json<PaymentMethodPatch>,
) -> Result<HttpResponse, AppError> {
  let patch = req_payload.into_inner();
  if patch.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
    return Err(AppError::validation("Payment method name cannot be blank."));
  }
  let method = app_state
    .stores
    .payment_methods
    .update(method_id.into_inner(), patch)
    .await?
    .ok_or_else(|| AppError::not_found("Payment method not found."))?;
  Ok(HttpResponse::Ok().json(method))
}

#[instrument(name = "handler::admin::delete_payment_method", skip(app_state, _session))]
pub async fn delete_payment_method_handler(
  app_state: web::Data<AppState>,
  _session: AdminSession,
  method_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  if !app_state.stores.payment_methods.delete(method_id.into_inner()).await? {
    return Err(AppError::not_found("Payment method not found."));
  }
  Ok(HttpResponse::Ok().json(json!({ "message": "Payment method deleted." })))
}

// --- Messaging ---

/// Sends a themed message to an applicant. The delivery report is the
/// response body; a failed delivery is not an HTTP error.
#[instrument(name = "handler::admin::message", skip_all)]
pub async fn send_message_handler(
  app_state: web::Data<AppState>,
  _session: AdminSession,
  req_payload: web::Json<AdminMessagePayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  if payload.to.trim().is_empty() || payload.subject.trim().is_empty() || payload.message.trim().is_empty() {
    return Err(AppError::validation("Recipient, subject and message are required."));
  }

  let html = templates::admin_message(&payload.applicant_name, &payload.message);
  let subject = templates::header_text(&payload.subject);
  let report = app_state.mailer.send(payload.to.trim(), &subject, &html).await;
  if !report.success {
    warn!(error = ?report.error, "Admin message could not be delivered.");
  }
  Ok(HttpResponse::Ok().json(report))
}
