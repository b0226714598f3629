// covenant/src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::item::ItemSummary;
use super::registration::Registration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "order_status_enum", rename_all = "lowercase"))]
pub enum OrderStatus {
  #[default]
  Pending,
  Processing,
  Shipped,
  Delivered,
  Cancelled,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
  pub id: Uuid,
  pub registration_id: Uuid,
  pub item_id: Uuid,
  pub order_number: String,
  pub payment_method: String,
  pub status: OrderStatus,
  /// Item price at the moment of purchase.
  pub total_price_cents: i64,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
  pub registration_id: Uuid,
  pub item_id: Uuid,
  pub order_number: String,
  pub payment_method: String,
  pub total_price_cents: i64,
}

impl NewOrder {
  pub(crate) fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> Order {
    Order {
      id,
      registration_id: self.registration_id,
      item_id: self.item_id,
      order_number: self.order_number,
      payment_method: self.payment_method,
      status: OrderStatus::Pending,
      total_price_cents: self.total_price_cents,
      created_at,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrantSummary {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  pub unique_code: String,
}

impl From<&Registration> for RegistrantSummary {
  fn from(registration: &Registration) -> Self {
    RegistrantSummary {
      id: registration.id,
      name: registration.name.clone(),
      email: registration.email.clone(),
      unique_code: registration.unique_code.clone(),
    }
  }
}

/// An order joined with the registrant who placed it and the item bought.
/// `item` is `None` once the item has been removed from the catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
  #[serde(flatten)]
  pub order: Order,
  pub registrant: RegistrantSummary,
  pub item: Option<ItemSummary>,
}
