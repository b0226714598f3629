// covenant_server/src/pipelines/contexts.rs

//! Data threaded through each workflow. Handlers receive these wrapped in
//! `covenant::ContextData`.

use crate::state::AppState;
use covenant::models::{Item, Order, Registration};
use serde::Deserialize;

/// A registration form as submitted. Missing fields deserialize empty so
/// validation can name them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationSubmission {
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
}

#[derive(Clone)]
pub struct RegistrationCtxData {
  pub app_state: AppState,
  pub submission: RegistrationSubmission,
  pub unique_code: Option<String>,
  pub registration: Option<Registration>,
  pub admin_notified: bool,
  pub welcome_sent: bool,
}

impl RegistrationCtxData {
  pub fn new(app_state: AppState, submission: RegistrationSubmission) -> Self {
    Self {
      app_state,
      submission,
      unique_code: None,
      registration: None,
      admin_notified: false,
      welcome_sent: false,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderSubmission {
  pub registration_code: String,
  pub item_id: String,
  pub payment_method: String,
}

#[derive(Clone)]
pub struct OrderCtxData {
  pub app_state: AppState,
  pub submission: OrderSubmission,
  pub registrant: Option<Registration>,
  pub item: Option<Item>,
  pub order: Option<Order>,
  pub admin_notified: bool,
  pub confirmation_sent: bool,
}

impl OrderCtxData {
  pub fn new(app_state: AppState, submission: OrderSubmission) -> Self {
    Self {
      app_state,
      submission,
      registrant: None,
      item: None,
      order: None,
      admin_notified: false,
      confirmation_sent: false,
    }
  }
}
