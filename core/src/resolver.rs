// covenant/src/resolver.rs

//! Resolves user-typed identifiers back to records. Matching is exact after
//! normalization; any miss fails closed with `NotFound`.

use crate::error::{CovenantError, CovenantResult};
use crate::identifier::normalize_code;
use crate::models::{OrderDetails, Registration};
use crate::store::{OrderStore, RegistrationStore};
use tracing::{debug, instrument};
use uuid::Uuid;

#[instrument(name = "resolver::resolve_registration", skip(store))]
pub async fn resolve_registration(store: &dyn RegistrationStore, code: &str) -> CovenantResult<Registration> {
  let normalized = normalize_code(code);
  if normalized.is_empty() {
    return Err(CovenantError::not_found("Registration code not found."));
  }
  match store.find_by_code(&normalized).await? {
    Some(registration) => {
      debug!(registration_id = %registration.id, "Registration code resolved.");
      Ok(registration)
    }
    None => Err(CovenantError::not_found("Registration code not found.")),
  }
}

/// An order number alone is not enough: the order must also belong to `registration_id`.
#[instrument(name = "resolver::resolve_order", skip(store))]
pub async fn resolve_order(
  store: &dyn OrderStore,
  registration_id: Uuid,
  order_number: &str,
) -> CovenantResult<OrderDetails> {
  let normalized = normalize_code(order_number);
  if normalized.is_empty() {
    return Err(CovenantError::not_found("Order not found for this registration."));
  }
  store
    .find_for_registrant(registration_id, &normalized)
    .await?
    .ok_or_else(|| CovenantError::not_found("Order not found for this registration."))
}
