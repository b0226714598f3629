// covenant/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CovenantError {
  #[error("Unauthorized: {0}")]
  Unauthorized(String),

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Validation failed: {0}")]
  Validation(String),

  /// A store-level uniqueness constraint rejected the write.
  #[error("Duplicate identifier for '{field}': {value}")]
  DuplicateIdentifier { field: String, value: String },

  /// The record store, object storage or mail transport could not be reached
  /// or rejected the operation.
  #[error("Upstream failure: {source}")]
  Upstream {
    #[source]
    source: AnyhowError,
  },

  #[error("Handler missing for required step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("No workflow registered for context type {type_name}")]
  WorkflowNotRegistered { type_name: String },

  #[error("Internal error: {0}")]
  Internal(String),
}

impl CovenantError {
  pub fn not_found(what: impl Into<String>) -> Self {
    CovenantError::NotFound(what.into())
  }

  pub fn validation(msg: impl Into<String>) -> Self {
    CovenantError::Validation(msg.into())
  }

  pub fn upstream(err: impl Into<AnyhowError>) -> Self {
    CovenantError::Upstream { source: err.into() }
  }

  /// Stable machine-readable category, used as the `code` of API error bodies.
  pub fn category(&self) -> &'static str {
    match self {
      CovenantError::Unauthorized(_) => "unauthorized",
      CovenantError::NotFound(_) => "not_found",
      CovenantError::Validation(_) => "validation_failure",
      CovenantError::DuplicateIdentifier { .. } => "duplicate_identifier",
      CovenantError::Upstream { .. } => "upstream_failure",
      CovenantError::HandlerMissing { .. }
      | CovenantError::WorkflowNotRegistered { .. }
      | CovenantError::Internal(_) => "internal",
    }
  }
}

impl From<AnyhowError> for CovenantError {
  fn from(err: AnyhowError) -> Self {
    // Unwrap a CovenantError that travelled through anyhow instead of nesting it.
    match err.downcast::<CovenantError>() {
      Ok(inner) => inner,
      Err(other) => CovenantError::Upstream { source: other },
    }
  }
}

pub type CovenantResult<T, E = CovenantError> = std::result::Result<T, E>;
