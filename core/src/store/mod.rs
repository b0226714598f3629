// covenant/src/store/mod.rs

//! Repository interfaces over the record store.
//!
//! Each entity gets its own trait so callers depend only on what they use, and
//! joined reads come back fully hydrated ([`OrderDetails`]) rather than relying
//! on the backend to populate references on demand.

pub mod memory;

use crate::error::CovenantResult;
use crate::models::{
  Item, NewItem, NewOrder, NewPaymentMethod, NewRegistration, Order, OrderDetails, OrderStatus, PaymentMethod,
  PaymentMethodPatch, Registration, RegistrationStatus,
};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub use memory::MemoryStore;

#[async_trait]
pub trait RegistrationStore: Send + Sync {
  async fn create(&self, new: NewRegistration) -> CovenantResult<Registration>;

  async fn find_by_id(&self, id: Uuid) -> CovenantResult<Option<Registration>>;

  /// Exact match on the stored code. Callers normalize first.
  async fn find_by_code(&self, unique_code: &str) -> CovenantResult<Option<Registration>>;

  /// Newest first.
  async fn list(&self) -> CovenantResult<Vec<Registration>>;

  async fn update_status(&self, id: Uuid, status: RegistrationStatus) -> CovenantResult<Option<Registration>>;
}

#[async_trait]
pub trait ItemStore: Send + Sync {
  async fn create(&self, new: NewItem) -> CovenantResult<Item>;

  async fn find_by_id(&self, id: Uuid) -> CovenantResult<Option<Item>>;

  /// Newest first.
  async fn list(&self) -> CovenantResult<Vec<Item>>;

  /// Returns whether a record was removed.
  async fn delete(&self, id: Uuid) -> CovenantResult<bool>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
  /// Fails with `DuplicateIdentifier` when `order_number` is already taken.
  /// The existing order is left untouched.
  async fn create(&self, new: NewOrder) -> CovenantResult<Order>;

  /// The order carrying `order_number`, but only if it belongs to `registration_id`.
  async fn find_for_registrant(
    &self,
    registration_id: Uuid,
    order_number: &str,
  ) -> CovenantResult<Option<OrderDetails>>;

  /// Newest first.
  async fn list_details(&self) -> CovenantResult<Vec<OrderDetails>>;

  async fn update_status(&self, id: Uuid, status: OrderStatus) -> CovenantResult<Option<Order>>;
}

#[async_trait]
pub trait PaymentMethodStore: Send + Sync {
  async fn create(&self, new: NewPaymentMethod) -> CovenantResult<PaymentMethod>;

  async fn list_active(&self) -> CovenantResult<Vec<PaymentMethod>>;

  async fn list_all(&self) -> CovenantResult<Vec<PaymentMethod>>;

  async fn update(&self, id: Uuid, patch: PaymentMethodPatch) -> CovenantResult<Option<PaymentMethod>>;

  async fn delete(&self, id: Uuid) -> CovenantResult<bool>;
}

/// Handles to every repository, shared across requests.
#[derive(Clone)]
pub struct Stores {
  pub registrations: Arc<dyn RegistrationStore>,
  pub items: Arc<dyn ItemStore>,
  pub orders: Arc<dyn OrderStore>,
  pub payment_methods: Arc<dyn PaymentMethodStore>,
}

impl Stores {
  /// All four repositories served by one backend object.
  pub fn from_backend<B>(backend: Arc<B>) -> Self
  where
    B: RegistrationStore + ItemStore + OrderStore + PaymentMethodStore + 'static,
  {
    Stores {
      registrations: backend.clone(),
      items: backend.clone(),
      orders: backend.clone(),
      payment_methods: backend,
    }
  }

  pub fn in_memory() -> Self {
    Self::from_backend(Arc::new(MemoryStore::new()))
  }
}

impl std::fmt::Debug for Stores {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Stores").finish_non_exhaustive()
  }
}
