// covenant_server/src/pipelines/order_pipeline.rs

use crate::errors::{AppError, Result as AppResult};
use crate::pipelines::common_steps;
use crate::pipelines::contexts::OrderCtxData;
use crate::services::templates;
use covenant::models::NewOrder;
use covenant::{resolve_registration, ContextData, StepControl, Workflow, WorkflowRegistry};
use tracing::{event, info, instrument, warn, Level};
use uuid::Uuid;

/// Registers the order placement pipeline.
///
/// The order number is issued inside `create_order` and never retried: a
/// collision fails the submission and the customer submits again.
pub fn register_order_pipeline(registry: &WorkflowRegistry<AppError>) {
  let mut workflow = Workflow::<OrderCtxData, AppError>::new(
    "order",
    &[
      ("validate_order", false),
      ("resolve_registrant", false),
      ("load_item", false),
      ("create_order", false),
      ("notify_admin_of_order", true),
      ("confirm_order_to_registrant", true),
    ],
  );

  workflow.on("validate_order", |ctx_data: ContextData<OrderCtxData>| {
    Box::pin(async move {
      let (code_blank, item_blank, method_blank) = {
        let guard = ctx_data.read();
        let form = &guard.submission;
        (
          form.registration_code.trim().is_empty(),
          form.item_id.trim().is_empty(),
          form.payment_method.trim().is_empty(),
        )
      };
      if code_blank || item_blank || method_blank {
        warn!(code_blank, item_blank, method_blank, "Order submission incomplete.");
        return Err(AppError::validation(
          "Registration code, item and payment method are required.",
        ));
      }
      Ok::<_, AppError>(StepControl::Continue)
    })
  });

  workflow.on("resolve_registrant", |ctx_data: ContextData<OrderCtxData>| {
    Box::pin(async move {
      let (stores, code) = {
        let guard = ctx_data.read();
        (guard.app_state.stores.clone(), guard.submission.registration_code.clone())
      };
      let registrant = resolve_registration(stores.registrations.as_ref(), &code).await?;
      event!(Level::DEBUG, registration_id = %registrant.id, "Registrant resolved for order.");
      ctx_data.write().registrant = Some(registrant);
      Ok::<_, AppError>(StepControl::Continue)
    })
  });

  workflow.on("load_item", load_item);
  workflow.on("create_order", create_order);

  workflow.on("notify_admin_of_order", |ctx_data: ContextData<OrderCtxData>| {
    Box::pin(async move {
      let (app_state, registrant, item, order) = {
        let guard = ctx_data.read();
        (guard.app_state.clone(), guard.registrant.clone(), guard.item.clone(), guard.order.clone())
      };
      let (Some(registrant), Some(item), Some(order)) = (registrant, item, order) else {
        return Ok(StepControl::Continue);
      };

      let rendered = templates::admin_order_notice(
        &order.order_number,
        &registrant,
        &item,
        &order.payment_method,
        &app_state.config.admin_dashboard_url(),
      );
      common_steps::send_notification(app_state.mailer.as_ref(), &app_state.config.admin_email, rendered).await?;
      ctx_data.write().admin_notified = true;
      Ok::<_, AppError>(StepControl::Continue)
    })
  });

  workflow.on("confirm_order_to_registrant", |ctx_data: ContextData<OrderCtxData>| {
    Box::pin(async move {
      let (app_state, registrant, item, order) = {
        let guard = ctx_data.read();
        (guard.app_state.clone(), guard.registrant.clone(), guard.item.clone(), guard.order.clone())
      };
      let (Some(registrant), Some(item), Some(order)) = (registrant, item, order) else {
        return Ok(StepControl::Continue);
      };

      let rendered = templates::order_confirmation(&order.order_number, &registrant, &item);
      common_steps::send_notification(app_state.mailer.as_ref(), &registrant.email, rendered).await?;
      ctx_data.write().confirmation_sent = true;
      Ok::<_, AppError>(StepControl::Continue)
    })
  });

  registry.register(workflow);
  tracing::info!("Order pipeline registered.");
}

#[instrument(name = "order_step::load_item", skip_all, err(Display))]
async fn load_item(ctx_data: ContextData<OrderCtxData>) -> AppResult<StepControl> {
  let (stores, raw_item_id) = {
    let guard = ctx_data.read();
    (guard.app_state.stores.clone(), guard.submission.item_id.trim().to_string())
  };

  let item_id = Uuid::parse_str(&raw_item_id).map_err(|_| {
    warn!(item_id = %raw_item_id, "Malformed item id in order submission.");
    AppError::validation("Invalid item id.")
  })?;
  let item = stores
    .items
    .find_by_id(item_id)
    .await?
    .ok_or_else(|| AppError::not_found("Item not found."))?;

  ctx_data.write().item = Some(item);
  Ok(StepControl::Continue)
}

#[instrument(name = "order_step::create", skip_all, err(Display))]
async fn create_order(ctx_data: ContextData<OrderCtxData>) -> AppResult<StepControl> {
  let (app_state, registrant_id, item, payment_method) = {
    let guard = ctx_data.read();
    let registrant_id = guard
      .registrant
      .as_ref()
      .map(|r| r.id)
      .ok_or_else(|| AppError::Internal("Registrant was not resolved before create.".to_string()))?;
    let item = guard
      .item
      .clone()
      .ok_or_else(|| AppError::Internal("Item was not loaded before create.".to_string()))?;
    (
      guard.app_state.clone(),
      registrant_id,
      item,
      guard.submission.payment_method.trim().to_string(),
    )
  };

  let new = NewOrder {
    registration_id: registrant_id,
    item_id: item.id,
    order_number: app_state.identifiers.order_number(),
    payment_method,
    total_price_cents: item.price_cents,
  };
  let order = app_state.stores.orders.create(new).await?;
  info!(order_number = %order.order_number, order_id = %order.id, "Order recorded.");
  ctx_data.write().order = Some(order);
  Ok(StepControl::Continue)
}
