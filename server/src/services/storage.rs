// covenant_server/src/services/storage.rs

//! Object storage for uploaded documents. Records only ever hold the public URL.

use async_trait::async_trait;
use covenant::{CovenantError, CovenantResult};
use std::path::{Component, Path, PathBuf};
use tracing::{info, instrument};

#[async_trait]
pub trait ObjectStorage: Send + Sync {
  /// Stores `bytes` under the relative `path` and returns its public URL.
  async fn upload(&self, bytes: Vec<u8>, path: &str) -> CovenantResult<String>;
}

/// Writes objects under a local directory that is served at `public_base_url`.
pub struct LocalStorage {
  root: PathBuf,
  public_base_url: String,
}

impl LocalStorage {
  pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
    Self {
      root: root.into(),
      public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
    }
  }
}

fn is_safe_relative(path: &Path) -> bool {
  !path.as_os_str().is_empty() && path.components().all(|c| matches!(c, Component::Normal(_)))
}

#[async_trait]
impl ObjectStorage for LocalStorage {
  #[instrument(name = "storage::upload", skip(self, bytes), fields(size = bytes.len()))]
  async fn upload(&self, bytes: Vec<u8>, path: &str) -> CovenantResult<String> {
    let relative = Path::new(path);
    if !is_safe_relative(relative) {
      return Err(CovenantError::validation(format!("Invalid storage path '{}'", path)));
    }

    let target = self.root.join(relative);
    if let Some(parent) = target.parent() {
      tokio::fs::create_dir_all(parent).await.map_err(CovenantError::upstream)?;
    }
    tokio::fs::write(&target, &bytes).await.map_err(CovenantError::upstream)?;

    let url = format!("{}/{}", self.public_base_url, path);
    info!(%url, "Object stored.");
    Ok(url)
  }
}
