// covenant_server/src/web/routes.rs

use actix_web::error::{JsonPayloadError, PathError};
use actix_web::{web, HttpRequest};
use tracing::warn;

use crate::errors::AppError;
use crate::web::handlers::{
  admin_handlers, auth_handlers, contact_handlers, registration_handlers, shop_handlers, upload_handlers,
};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Rejected JSON bodies answer with the regular error shape; serde's own
/// message only goes to the log.
fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
  warn!(path = %req.path(), error = %err, "Rejected request body.");
  let message = match err {
    JsonPayloadError::ContentType => "Request body must be JSON.",
    JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
      "Request body is too large."
    }
    _ => "Request body is malformed.",
  };
  AppError::validation(message).into()
}

fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
  warn!(path = %req.path(), error = %err, "Rejected path parameter.");
  AppError::validation("Invalid identifier in path.").into()
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api")
      .app_data(web::JsonConfig::default().error_handler(json_error_handler))
      .app_data(web::PathConfig::default().error_handler(path_error_handler))
      .route("/health", web::get().to(health_check_handler))
      .route("/uploads/{folder}", web::post().to(upload_handlers::upload_handler))
      .route("/register", web::post().to(registration_handlers::register_handler))
      .route("/contact", web::post().to(contact_handlers::contact_handler))
      .route(
        "/payment-methods",
        web::get().to(shop_handlers::list_payment_methods_handler),
      )
      .service(
        web::scope("/shop")
          .route("/items", web::get().to(shop_handlers::list_items_handler))
          .route("/order", web::post().to(shop_handlers::place_order_handler))
          .route("/track", web::post().to(shop_handlers::track_order_handler)),
      )
      .service(
        web::scope("/auth")
          .route("/signin", web::post().to(auth_handlers::signin_handler))
          .route("/signout", web::post().to(auth_handlers::signout_handler)),
      )
      .service(
        web::scope("/admin")
          .route(
            "/registrations",
            web::get().to(admin_handlers::list_registrations_handler),
          )
          .route(
            "/registrations/{id}/status",
            web::put().to(admin_handlers::update_registration_status_handler),
          )
          .service(
            web::resource("/items")
              .route(web::get().to(admin_handlers::list_items_handler))
              .route(web::post().to(admin_handlers::create_item_handler)),
          )
          .route("/items/{id}", web::delete().to(admin_handlers::delete_item_handler))
          .route("/orders", web::get().to(admin_handlers::list_orders_handler))
          .route(
            "/orders/{id}/status",
            web::put().to(admin_handlers::update_order_status_handler),
          )
          .service(
            web::resource("/payment-methods")
              .route(web::get().to(admin_handlers::list_payment_methods_handler))
              .route(web::post().to(admin_handlers::create_payment_method_handler)),
          )
          .service(
            web::resource("/payment-methods/{id}")
              .route(web::put().to(admin_handlers::update_payment_method_handler))
              .route(web::delete().to(admin_handlers::delete_payment_method_handler)),
          )
          .route("/message", web::post().to(admin_handlers::send_message_handler)),
      ),
  );
  // Public document URLs default to `{APP_BASE_URL}/uploads/...`.
  cfg.route(
    "/uploads/{folder}/{file}",
    web::get().to(upload_handlers::serve_upload_handler),
  );
}
