// covenant/src/models/item.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A purchasable artifact in the shop catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Item {
  pub id: Uuid,
  pub name: String,
  pub price_cents: i64,
  pub description: String,
  pub mystical_properties: Option<String>,
  pub image_url: Option<String>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
  pub name: String,
  pub price_cents: i64,
  pub description: String,
  #[serde(default)]
  pub mystical_properties: Option<String>,
  #[serde(default)]
  pub image_url: Option<String>,
}

impl NewItem {
  pub(crate) fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> Item {
    Item {
      id,
      name: self.name,
      price_cents: self.price_cents,
      description: self.description,
      mystical_properties: self.mystical_properties,
      image_url: self.image_url,
      created_at,
    }
  }
}

/// The slice of an item shown alongside an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
  pub id: Uuid,
  pub name: String,
  pub price_cents: i64,
  pub description: String,
  pub image_url: Option<String>,
}

impl From<&Item> for ItemSummary {
  fn from(item: &Item) -> Self {
    ItemSummary {
      id: item.id,
      name: item.name.clone(),
      price_cents: item.price_cents,
      description: item.description.clone(),
      image_url: item.image_url.clone(),
    }
  }
}
