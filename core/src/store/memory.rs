// covenant/src/store/memory.rs

//! In-process record store. Used when no database is configured and by tests.

use super::{ItemStore, OrderStore, PaymentMethodStore, RegistrationStore};
use crate::error::{CovenantError, CovenantResult};
use crate::models::{
  Item, ItemSummary, NewItem, NewOrder, NewPaymentMethod, NewRegistration, Order, OrderDetails, OrderStatus,
  PaymentMethod, PaymentMethodPatch, RegistrantSummary, Registration, RegistrationStatus,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
  // Insertion order; listings walk these backwards for newest-first.
  registrations: Vec<Registration>,
  items: Vec<Item>,
  orders: Vec<Order>,
  payment_methods: Vec<PaymentMethod>,
}

impl Tables {
  fn hydrate(&self, order: &Order) -> CovenantResult<OrderDetails> {
    let registrant = self
      .registrations
      .iter()
      .find(|r| r.id == order.registration_id)
      .map(RegistrantSummary::from)
      .ok_or_else(|| {
        CovenantError::Internal(format!(
          "Order {} references missing registration {}",
          order.order_number, order.registration_id
        ))
      })?;
    let item = self.items.iter().find(|i| i.id == order.item_id).map(ItemSummary::from);
    Ok(OrderDetails {
      order: order.clone(),
      registrant,
      item,
    })
  }
}

/// A single lock guards all tables, so multi-table checks (order creation)
/// see a consistent snapshot.
#[derive(Default)]
pub struct MemoryStore {
  tables: RwLock<Tables>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl RegistrationStore for MemoryStore {
  #[instrument(name = "memory_store::create_registration", skip_all, fields(unique_code = %new.unique_code))]
  async fn create(&self, new: NewRegistration) -> CovenantResult<Registration> {
    let record = new.into_record(Uuid::new_v4(), Utc::now());
    self.tables.write().registrations.push(record.clone());
    debug!(registration_id = %record.id, "Registration stored.");
    Ok(record)
  }

  async fn find_by_id(&self, id: Uuid) -> CovenantResult<Option<Registration>> {
    Ok(self.tables.read().registrations.iter().find(|r| r.id == id).cloned())
  }

  async fn find_by_code(&self, unique_code: &str) -> CovenantResult<Option<Registration>> {
    Ok(
      self
        .tables
        .read()
        .registrations
        .iter()
        .find(|r| r.unique_code == unique_code)
        .cloned(),
    )
  }

  async fn list(&self) -> CovenantResult<Vec<Registration>> {
    Ok(self.tables.read().registrations.iter().rev().cloned().collect())
  }

  async fn update_status(&self, id: Uuid, status: RegistrationStatus) -> CovenantResult<Option<Registration>> {
    let mut tables = self.tables.write();
    Ok(tables.registrations.iter_mut().find(|r| r.id == id).map(|r| {
      r.status = status;
      r.clone()
    }))
  }
}

#[async_trait]
impl ItemStore for MemoryStore {
  async fn create(&self, new: NewItem) -> CovenantResult<Item> {
    let record = new.into_record(Uuid::new_v4(), Utc::now());
    self.tables.write().items.push(record.clone());
    Ok(record)
  }

  async fn find_by_id(&self, id: Uuid) -> CovenantResult<Option<Item>> {
    Ok(self.tables.read().items.iter().find(|i| i.id == id).cloned())
  }

  async fn list(&self) -> CovenantResult<Vec<Item>> {
    Ok(self.tables.read().items.iter().rev().cloned().collect())
  }

  async fn delete(&self, id: Uuid) -> CovenantResult<bool> {
    let mut tables = self.tables.write();
    let before = tables.items.len();
    tables.items.retain(|i| i.id != id);
    Ok(tables.items.len() != before)
  }
}

#[async_trait]
impl OrderStore for MemoryStore {
  #[instrument(name = "memory_store::create_order", skip_all, fields(order_number = %new.order_number))]
  async fn create(&self, new: NewOrder) -> CovenantResult<Order> {
    let mut tables = self.tables.write();
    if tables.orders.iter().any(|o| o.order_number == new.order_number) {
      warn!("Order number already taken.");
      return Err(CovenantError::DuplicateIdentifier {
        field: "order_number".to_string(),
        value: new.order_number,
      });
    }
    let record = new.into_record(Uuid::new_v4(), Utc::now());
    tables.orders.push(record.clone());
    Ok(record)
  }

  async fn find_for_registrant(
    &self,
    registration_id: Uuid,
    order_number: &str,
  ) -> CovenantResult<Option<OrderDetails>> {
    let tables = self.tables.read();
    tables
      .orders
      .iter()
      .find(|o| o.order_number == order_number && o.registration_id == registration_id)
      .map(|o| tables.hydrate(o))
      .transpose()
  }

  async fn list_details(&self) -> CovenantResult<Vec<OrderDetails>> {
    let tables = self.tables.read();
    tables.orders.iter().rev().map(|o| tables.hydrate(o)).collect()
  }

  async fn update_status(&self, id: Uuid, status: OrderStatus) -> CovenantResult<Option<Order>> {
    let mut tables = self.tables.write();
    Ok(tables.orders.iter_mut().find(|o| o.id == id).map(|o| {
      o.status = status;
      o.clone()
    }))
  }
}

#[async_trait]
impl PaymentMethodStore for MemoryStore {
  async fn create(&self, new: NewPaymentMethod) -> CovenantResult<PaymentMethod> {
    let record = new.into_record(Uuid::new_v4(), Utc::now());
    self.tables.write().payment_methods.push(record.clone());
    Ok(record)
  }

  async fn list_active(&self) -> CovenantResult<Vec<PaymentMethod>> {
    Ok(
      self
        .tables
        .read()
        .payment_methods
        .iter()
        .filter(|m| m.is_active)
        .cloned()
        .collect(),
    )
  }

  async fn list_all(&self) -> CovenantResult<Vec<PaymentMethod>> {
    Ok(self.tables.read().payment_methods.clone())
  }

  async fn update(&self, id: Uuid, patch: PaymentMethodPatch) -> CovenantResult<Option<PaymentMethod>> {
    let mut tables = self.tables.write();
    Ok(tables.payment_methods.iter_mut().find(|m| m.id == id).map(|m| {
      patch.apply(m);
      m.clone()
    }))
  }

  async fn delete(&self, id: Uuid) -> CovenantResult<bool> {
    let mut tables = self.tables.write();
    let before = tables.payment_methods.len();
    tables.payment_methods.retain(|m| m.id != id);
    Ok(tables.payment_methods.len() != before)
  }
}
