// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use covenant::identifier::{issue_order_number, issue_registration_code};
use covenant::models::{Item, NewItem};
use covenant::{IdentifierSource, RandomIdentifiers, Stores};
use covenant_server::config::Redacted;
use covenant_server::services::auth_service::AuthPolicy;
use covenant_server::services::mailer::{DeliveryReport, LogMailer, Mailer};
use covenant_server::services::storage::LocalStorage;
use covenant_server::{AppConfig, AppError, AppState};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tracing::Level;

pub const ADMIN_USER: &str = "keeper";
pub const ADMIN_PASS: &str = "open-sesame";
pub const ADMIN_EMAIL: &str = "council@example.com";

/// Builds the actix test service for an `AppState`.
macro_rules! init_app {
  ($state:expr) => {
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new($state))
        .configure(covenant_server::web::configure_app_routes),
    )
    .await
  };
}

// --- Test doubles ---

/// Hands out the queued order numbers first, then random ones.
pub struct ScriptedIdentifiers {
  order_numbers: Mutex<VecDeque<String>>,
}

impl ScriptedIdentifiers {
  pub fn with_order_numbers(numbers: &[&str]) -> Self {
    Self {
      order_numbers: Mutex::new(numbers.iter().map(|n| n.to_string()).collect()),
    }
  }
}

impl IdentifierSource for ScriptedIdentifiers {
  fn registration_code(&self) -> String {
    issue_registration_code()
  }

  fn order_number(&self) -> String {
    self.order_numbers.lock().pop_front().unwrap_or_else(issue_order_number)
  }
}

/// A mail transport that is always down.
pub struct UnreachableMailer;

#[async_trait]
impl Mailer for UnreachableMailer {
  async fn send(&self, _to: &str, _subject: &str, _html: &str) -> DeliveryReport {
    DeliveryReport::failed("connection refused")
  }
}

/// Plain comparison; keeps tests clear of argon2 cost.
pub struct StaticPolicy;

impl AuthPolicy for StaticPolicy {
  fn authenticate(&self, username: &str, password: &str) -> Result<bool, AppError> {
    Ok(username == ADMIN_USER && password == ADMIN_PASS)
  }
}

// --- Harness ---

pub struct Harness {
  pub state: AppState,
  pub outbox: Arc<LogMailer>,
  pub upload_dir: TempDir,
}

pub fn test_config(upload_dir: &Path) -> AppConfig {
  AppConfig {
    server_host: "127.0.0.1".to_string(),
    server_port: 0,
    database_url: None,
    apply_schema: false,
    app_base_url: "http://localhost:8080".to_string(),
    admin_username: ADMIN_USER.to_string(),
    admin_password: Redacted(ADMIN_PASS.to_string()),
    admin_email: ADMIN_EMAIL.to_string(),
    mail_sender: "noreply@example.com".to_string(),
    upload_dir: upload_dir.to_path_buf(),
    public_asset_base_url: "http://localhost:8080/uploads".to_string(),
    session_ttl_minutes: 30,
  }
}

fn build(identifiers: Arc<dyn IdentifierSource>, mailer: Option<Arc<dyn Mailer>>) -> Harness {
  Lazy::force(&TRACING);
  let upload_dir = tempfile::tempdir().expect("temp upload dir");
  let config = test_config(upload_dir.path());
  let outbox = Arc::new(LogMailer::with_outbox(config.mail_sender.clone()));
  let mailer = mailer.unwrap_or_else(|| outbox.clone() as Arc<dyn Mailer>);
  let storage = LocalStorage::new(upload_dir.path(), config.public_asset_base_url.clone());

  let state = AppState::new(
    config,
    Stores::in_memory(),
    identifiers,
    mailer,
    Arc::new(storage),
    Arc::new(StaticPolicy),
  );
  Harness {
    state,
    outbox,
    upload_dir,
  }
}

pub fn harness() -> Harness {
  build(Arc::new(RandomIdentifiers), None)
}

pub fn harness_with_identifiers(identifiers: Arc<dyn IdentifierSource>) -> Harness {
  build(identifiers, None)
}

pub fn harness_with_mailer(mailer: Arc<dyn Mailer>) -> Harness {
  build(Arc::new(RandomIdentifiers), Some(mailer))
}

// --- Fixtures ---

pub fn registration_json(name: &str, email: &str) -> Value {
  json!({
    "name": name,
    "country": "Italy",
    "city": "Florence",
    "dateOfBirth": "1988-07-14",
    "maritalStatus": "single",
    "occupation": "Goldsmith",
    "salary": "40000",
    "email": email,
    "phone": "+39 055 123456",
    "paymentMethod": "Bank Transfer",
    "personalPhotoUrl": "http://localhost:8080/uploads/members/photo.jpg",
    "idCardFrontUrl": "http://localhost:8080/uploads/ids/front.jpg"
  })
}

pub async fn seed_item(state: &AppState, name: &str, price_cents: i64) -> Item {
  state
    .stores
    .items
    .create(NewItem {
      name: name.to_string(),
      price_cents,
      description: format!("{} of uncommon make.", name),
      mystical_properties: Some("Hums faintly at dusk.".to_string()),
      image_url: None,
    })
    .await
    .expect("seed item")
}

// --- Tracing ---
static TRACING: Lazy<()> = Lazy::new(|| {
  let _ = tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init();
});
