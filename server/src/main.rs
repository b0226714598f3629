// covenant_server/src/main.rs

use covenant::{RandomIdentifiers, Stores};
use covenant_server::db::PgStore;
use covenant_server::services::auth_service::CredentialPolicy;
use covenant_server::services::mailer::LogMailer;
use covenant_server::services::storage::LocalStorage;
use covenant_server::web::configure_app_routes;
use covenant_server::{AppConfig, AppState};

use actix_web::{web as actix_data, App, HttpServer};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting covenant server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };

  let stores = match app_config.database_url.as_deref() {
    Some(url) => {
      let pg_store = PgStore::connect(url).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to connect to the database.");
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
      })?;
      if app_config.apply_schema {
        pg_store.apply_schema().await.map_err(|e| {
          tracing::error!(error = %e, "Failed to apply database schema.");
          std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })?;
      }
      Stores::from_backend(Arc::new(pg_store))
    }
    None => {
      tracing::warn!("DATABASE_URL is not set; records are kept in memory and lost on restart.");
      Stores::in_memory()
    }
  };

  let auth_policy =
    CredentialPolicy::new(&app_config.admin_username, app_config.admin_password.expose()).map_err(|e| {
      tracing::error!(error = %e, "Failed to prepare admin credentials.");
      std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
  let mailer = LogMailer::new(app_config.mail_sender.clone());
  let storage = LocalStorage::new(app_config.upload_dir.clone(), app_config.public_asset_base_url.clone());

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  let app_state = AppState::new(
    app_config,
    stores,
    Arc::new(RandomIdentifiers),
    Arc::new(mailer),
    Arc::new(storage),
    Arc::new(auth_policy),
  );
  tracing::info!("Workflows registered.");

  tracing::info!("Attempting to bind server to {}...", server_address);
  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
