// tests/common/mod.rs
#![allow(dead_code)]

use covenant::models::{NewItem, NewOrder, NewRegistration};
use covenant::{ContextData, CovenantError, StepControl};
use once_cell::sync::Lazy;
use tracing::Level;
use uuid::Uuid;

// --- Workflow test context ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
  pub halt_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Covenant error: {0}")]
  Covenant(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<CovenantError> for TestError {
  fn from(err: CovenantError) -> Self {
    TestError::Covenant(format!("{:?}", err))
  }
}

pub fn create_simple_handler(
  step_name: &'static str,
  message_to_append: &'static str,
) -> impl Fn(ContextData<TestContext>) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<StepControl, TestError>> + Send>>
     + Send
     + Sync
     + 'static {
  move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.steps_executed.push(step_name.to_string());
      if guard.halt_at.as_deref() == Some(step_name) {
        return Ok(StepControl::Halt);
      }
      Ok(StepControl::Continue)
    })
  }
}

pub fn create_failing_handler(
  step_name: &'static str,
  error_message: &'static str,
) -> impl Fn(ContextData<TestContext>) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<StepControl, TestError>> + Send>>
     + Send
     + Sync
     + 'static {
  move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      Err(TestError::Handler(error_message.to_string()))
    })
  }
}

// --- Record builders ---
pub fn new_registration(name: &str, unique_code: &str) -> NewRegistration {
  NewRegistration {
    name: name.to_string(),
    country: "Portugal".to_string(),
    city: "Sintra".to_string(),
    date_of_birth: "1990-03-21".to_string(),
    marital_status: "single".to_string(),
    occupation: "Architect".to_string(),
    salary: "50000".to_string(),
    email: format!("{}@example.com", name.to_lowercase()),
    phone: "+351 912 345 678".to_string(),
    payment_method: "Bank transfer".to_string(),
    personal_photo_url: "https://assets.example.com/members/a.jpg".to_string(),
    id_card_front_url: "https://assets.example.com/ids/b.jpg".to_string(),
    id_card_back_url: None,
    unique_code: unique_code.to_string(),
  }
}

pub fn new_item(name: &str, price_cents: i64) -> NewItem {
  NewItem {
    name: name.to_string(),
    price_cents,
    description: format!("{} from the inner vault", name),
    mystical_properties: Some("Wards off doubt".to_string()),
    image_url: None,
  }
}

pub fn new_order(registration_id: Uuid, item_id: Uuid, order_number: &str, price_cents: i64) -> NewOrder {
  NewOrder {
    registration_id,
    item_id,
    order_number: order_number.to_string(),
    payment_method: "Bank transfer".to_string(),
    total_price_cents: price_cents,
  }
}

// --- Tracing setup ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
