// covenant/src/models/payment_method.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PaymentMethod {
  pub id: Uuid,
  pub name: String,
  pub description: Option<String>,
  /// Wallet address, bank account and the like. Only admins see this.
  pub details: Option<String>,
  pub is_active: bool,
  pub created_at: DateTime<Utc>,
}

/// What the public checkout sees of a payment method.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPaymentMethod {
  pub id: Uuid,
  pub name: String,
  pub description: Option<String>,
}

impl From<PaymentMethod> for PublicPaymentMethod {
  fn from(method: PaymentMethod) -> Self {
    PublicPaymentMethod {
      id: method.id,
      name: method.name,
      description: method.description,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPaymentMethod {
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub details: Option<String>,
  #[serde(default = "default_active")]
  pub is_active: bool,
}

fn default_active() -> bool {
  true
}

impl NewPaymentMethod {
  pub(crate) fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> PaymentMethod {
    PaymentMethod {
      id,
      name: self.name,
      description: self.description,
      details: self.details,
      is_active: self.is_active,
      created_at,
    }
  }
}

/// Partial update; absent fields keep their stored value. For the optional
/// texts an explicit `null` clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodPatch {
  pub name: Option<String>,
  #[serde(default, deserialize_with = "present")]
  pub description: Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub details: Option<Option<String>>,
  pub is_active: Option<bool>,
}

// Only runs for keys that appear in the body, so `null` arrives as `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(deserializer).map(Some)
}

impl PaymentMethodPatch {
  pub fn apply(self, method: &mut PaymentMethod) {
    if let Some(name) = self.name {
      method.name = name;
    }
    if let Some(description) = self.description {
      method.description = description;
    }
    if let Some(details) = self.details {
      method.details = details;
    }
    if let Some(is_active) = self.is_active {
      method.is_active = is_active;
    }
  }
}
