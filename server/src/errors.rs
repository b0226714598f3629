// covenant_server/src/errors.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use covenant::CovenantError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Domain(#[from] CovenantError),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  pub fn validation(msg: impl Into<String>) -> Self {
    AppError::Domain(CovenantError::validation(msg))
  }

  pub fn not_found(msg: impl Into<String>) -> Self {
    AppError::Domain(CovenantError::not_found(msg))
  }

  pub fn unauthorized(msg: impl Into<String>) -> Self {
    AppError::Domain(CovenantError::Unauthorized(msg.into()))
  }

  fn code(&self) -> &'static str {
    match self {
      AppError::Domain(inner) => inner.category(),
      AppError::Sqlx(_) => "upstream_failure",
      AppError::Config(_) | AppError::Internal(_) => "internal",
    }
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    AppError::Domain(CovenantError::from(err))
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Domain(inner) => match inner {
        CovenantError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        CovenantError::NotFound(_) => StatusCode::NOT_FOUND,
        CovenantError::Validation(_) => StatusCode::BAD_REQUEST,
        CovenantError::DuplicateIdentifier { .. } => StatusCode::CONFLICT,
        CovenantError::Upstream { .. } => StatusCode::SERVICE_UNAVAILABLE,
        CovenantError::HandlerMissing { .. }
        | CovenantError::WorkflowNotRegistered { .. }
        | CovenantError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
      AppError::Sqlx(_) => StatusCode::SERVICE_UNAVAILABLE,
      AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    // Client errors carry their own message; everything else gets a generic one.
    let message = match self {
      AppError::Domain(CovenantError::Unauthorized(m))
      | AppError::Domain(CovenantError::NotFound(m))
      | AppError::Domain(CovenantError::Validation(m)) => {
        tracing::warn!(application_error = %self, "Responding with client error");
        m.clone()
      }
      AppError::Domain(CovenantError::DuplicateIdentifier { .. }) => {
        tracing::error!(application_error = %self, "Identifier collision");
        "Your submission could not be recorded. Please try again.".to_string()
      }
      _ => {
        tracing::error!(application_error = %self, "Responding with error");
        "A connection to the records was disrupted. Please try again later.".to_string()
      }
    };
    HttpResponse::build(status).json(json!({ "error": message, "code": self.code() }))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::body::MessageBody;

  fn body_json(err: &AppError) -> serde_json::Value {
    let bytes = err.error_response().into_body().try_into_bytes().unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  #[test]
  fn client_errors_keep_their_message() {
    let err = AppError::not_found("Order not found for this registration.");
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    let body = body_json(&err);
    assert_eq!(body["error"], "Order not found for this registration.");
    assert_eq!(body["code"], "not_found");
  }

  #[test]
  fn duplicate_identifier_is_generic_conflict() {
    let err = AppError::Domain(CovenantError::DuplicateIdentifier {
      field: "order_number".to_string(),
      value: "ORD-AAAAAA".to_string(),
    });
    assert_eq!(err.status_code(), StatusCode::CONFLICT);
    let body = body_json(&err);
    assert_eq!(body["code"], "duplicate_identifier");
    assert!(!body["error"].as_str().unwrap().contains("ORD-AAAAAA"));
  }

  #[test]
  fn upstream_details_are_not_leaked() {
    let err = AppError::from(anyhow::anyhow!("password authentication failed for user \"covenant\""));
    assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(&err);
    assert_eq!(body["code"], "upstream_failure");
    assert!(!body["error"].as_str().unwrap().contains("password"));
  }

  #[test]
  fn database_setup_failures_are_unavailable() {
    let err = AppError::from(sqlx::Error::PoolTimedOut);
    assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(&err);
    assert_eq!(body["code"], "upstream_failure");
    assert!(!body["error"].as_str().unwrap().contains("pool"));
  }
}
