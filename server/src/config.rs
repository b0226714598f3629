// covenant_server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

/// A secret that prints as `[REDACTED]`.
#[derive(Clone)]
pub struct Redacted(pub String);

impl Redacted {
  pub fn expose(&self) -> &str {
    &self.0
  }
}

impl std::fmt::Debug for Redacted {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str("[REDACTED]")
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// `None` runs on the in-memory store.
  pub database_url: Option<String>,
  pub apply_schema: bool,
  pub app_base_url: String,

  pub admin_username: String,
  pub admin_password: Redacted,
  /// Receives new-registration, new-order and contact notices.
  pub admin_email: String,
  pub mail_sender: String,

  pub upload_dir: PathBuf,
  pub public_asset_base_url: String,

  pub session_ttl_minutes: i64,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());
    let apply_schema = get_env("APPLY_SCHEMA")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid APPLY_SCHEMA value: {}", e)))?;
    let app_base_url = get_env("APP_BASE_URL").unwrap_or_else(|_| format!("http://{}:{}", server_host, server_port));

    let admin_username = get_env("ADMIN_USERNAME")?;
    let admin_password = get_env("ADMIN_PASSWORD")?;
    if admin_password.is_empty() {
      return Err(AppError::Config("ADMIN_PASSWORD must not be empty".to_string()));
    }
    let admin_email = get_env("ADMIN_EMAIL")?;
    let mail_sender = get_env("MAIL_SENDER").unwrap_or_else(|_| "noreply@example.com".to_string());

    let upload_dir = PathBuf::from(get_env("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()));
    let public_asset_base_url =
      get_env("PUBLIC_ASSET_BASE_URL").unwrap_or_else(|_| format!("{}/uploads", app_base_url.trim_end_matches('/')));

    let session_ttl_minutes = get_env("SESSION_TTL_MINUTES")
      .unwrap_or_else(|_| "720".to_string())
      .parse::<i64>()
      .map_err(|e| AppError::Config(format!("Invalid SESSION_TTL_MINUTES: {}", e)))?;
    if session_ttl_minutes <= 0 {
      return Err(AppError::Config("SESSION_TTL_MINUTES must be positive".to_string()));
    }

    tracing::info!(
      in_memory_store = database_url.is_none(),
      upload_dir = %upload_dir.display(),
      "Application configuration loaded successfully."
    );

    Ok(Self {
      server_host,
      server_port,
      database_url,
      apply_schema,
      app_base_url,
      admin_username,
      admin_password: Redacted(admin_password),
      admin_email,
      mail_sender,
      upload_dir,
      public_asset_base_url,
      session_ttl_minutes,
    })
  }

  pub fn admin_dashboard_url(&self) -> String {
    format!("{}/admin", self.app_base_url.trim_end_matches('/'))
  }
}
