// covenant/src/models/registration.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "registration_status_enum", rename_all = "lowercase"))]
pub enum RegistrationStatus {
  #[default]
  Pending,
  Approved,
  Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Registration {
  pub id: Uuid,
  pub name: String,
  pub country: String,
  pub city: String,
  pub date_of_birth: String,
  pub marital_status: String,
  pub occupation: String,
  pub salary: String,
  pub email: String,
  pub phone: String,
  pub payment_method: String,
  pub personal_photo_url: String,
  pub id_card_front_url: String,
  pub id_card_back_url: Option<String>,
  pub unique_code: String,
  pub status: RegistrationStatus,
  pub created_at: DateTime<Utc>,
}

/// Everything a store needs to insert a registration. `unique_code` is issued
/// by the caller before the write.
#[derive(Debug, Clone)]
pub struct NewRegistration {
  pub name: String,
  pub country: String,
  pub city: String,
  pub date_of_birth: String,
  pub marital_status: String,
  pub occupation: String,
  pub salary: String,
  pub email: String,
  pub phone: String,
  pub payment_method: String,
  pub personal_photo_url: String,
  pub id_card_front_url: String,
  pub id_card_back_url: Option<String>,
  pub unique_code: String,
}

impl NewRegistration {
  pub(crate) fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> Registration {
    Registration {
      id,
      name: self.name,
      country: self.country,
      city: self.city,
      date_of_birth: self.date_of_birth,
      marital_status: self.marital_status,
      occupation: self.occupation,
      salary: self.salary,
      email: self.email,
      phone: self.phone,
      payment_method: self.payment_method,
      personal_photo_url: self.personal_photo_url,
      id_card_front_url: self.id_card_front_url,
      id_card_back_url: self.id_card_back_url,
      unique_code: self.unique_code,
      status: RegistrationStatus::Pending,
      created_at,
    }
  }
}
