// covenant_server/src/state.rs
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::pipelines;
use crate::services::auth_service::{AuthPolicy, SessionRegistry};
use crate::services::mailer::Mailer;
use crate::services::storage::ObjectStorage;
use covenant::{IdentifierSource, Stores, WorkflowRegistry};
use std::sync::Arc;

/// Everything a handler or workflow step needs, cloned per request.
#[derive(Clone)]
pub struct AppState {
  pub stores: Stores,
  pub workflows: Arc<WorkflowRegistry<AppError>>,
  pub config: Arc<AppConfig>,
  pub identifiers: Arc<dyn IdentifierSource>,
  pub mailer: Arc<dyn Mailer>,
  pub storage: Arc<dyn ObjectStorage>,
  pub auth_policy: Arc<dyn AuthPolicy>,
  pub sessions: Arc<SessionRegistry>,
}

impl AppState {
  /// Assembles the state and registers every workflow.
  pub fn new(
    config: AppConfig,
    stores: Stores,
    identifiers: Arc<dyn IdentifierSource>,
    mailer: Arc<dyn Mailer>,
    storage: Arc<dyn ObjectStorage>,
    auth_policy: Arc<dyn AuthPolicy>,
  ) -> Self {
    let workflows = Arc::new(WorkflowRegistry::<AppError>::new());
    pipelines::register_all_pipelines(&workflows);

    let sessions = Arc::new(SessionRegistry::new(chrono::Duration::minutes(config.session_ttl_minutes)));
    AppState {
      stores,
      workflows,
      config: Arc::new(config),
      identifiers,
      mailer,
      storage,
      auth_policy,
      sessions,
    }
  }
}
