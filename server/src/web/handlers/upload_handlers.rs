// covenant_server/src/web/handlers/upload_handlers.rs

use actix_web::{http::header, web, HttpRequest, HttpResponse};
use futures_util::StreamExt;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const UPLOAD_FOLDERS: &[&str] = &["members", "ids"];

fn extension_for(content_type: &str) -> Option<&'static str> {
  let essence = content_type.split(';').next().unwrap_or_default().trim();
  match essence.to_ascii_lowercase().as_str() {
    "image/jpeg" | "image/jpg" => Some("jpg"),
    "image/png" => Some("png"),
    "image/webp" => Some("webp"),
    "image/gif" => Some("gif"),
    _ => None,
  }
}

/// Stores one document image (the raw request body) and returns its public
/// URL, which the client then puts on the registration form.
#[instrument(name = "handler::upload", skip(app_state, req, payload))]
pub async fn upload_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  folder: web::Path<String>,
  mut payload: web::Payload,
) -> Result<HttpResponse, AppError> {
  let folder = folder.into_inner();
  if !UPLOAD_FOLDERS.contains(&folder.as_str()) {
    return Err(AppError::validation(format!("Unknown upload folder '{}'.", folder)));
  }

  let content_type = req
    .headers()
    .get(header::CONTENT_TYPE)
    .and_then(|value| value.to_str().ok())
    .unwrap_or_default();
  let Some(extension) = extension_for(content_type) else {
    warn!(%content_type, "Rejected upload with unsupported content type.");
    return Err(AppError::validation("Only JPEG, PNG, WebP or GIF images can be uploaded."));
  };

  let mut body = Vec::new();
  while let Some(chunk) = payload.next().await {
    let chunk = chunk.map_err(|err| {
      warn!(error = %err, "Upload body could not be read.");
      AppError::validation("Upload body could not be read.")
    })?;
    if body.len() + chunk.len() > MAX_UPLOAD_BYTES {
      warn!(limit = MAX_UPLOAD_BYTES, "Rejected oversized upload.");
      return Err(AppError::validation("File must be 10 MB or smaller."));
    }
    body.extend_from_slice(&chunk);
  }
  if body.is_empty() {
    return Err(AppError::validation("Upload body is empty."));
  }

  let path = format!("{}/{}.{}", folder, Uuid::new_v4(), extension);
  let size = body.len();
  let url = app_state.storage.upload(body, &path).await?;
  info!(%path, size, "Document uploaded.");
  Ok(HttpResponse::Created().json(json!({ "url": url })))
}

fn content_type_for(extension: &str) -> Option<&'static str> {
  match extension {
    "jpg" => Some("image/jpeg"),
    "png" => Some("image/png"),
    "webp" => Some("image/webp"),
    "gif" => Some("image/gif"),
    _ => None,
  }
}

/// Serves a previously uploaded document from the upload directory.
#[instrument(name = "handler::serve_upload", skip(app_state))]
pub async fn serve_upload_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
  let (folder, file_name) = path.into_inner();
  let not_found = || AppError::not_found("File not found.");

  if !UPLOAD_FOLDERS.contains(&folder.as_str()) || file_name.contains(&['/', '\\'][..]) || file_name.starts_with('.') {
    return Err(not_found());
  }
  let content_type = file_name
    .rsplit_once('.')
    .and_then(|(_, extension)| content_type_for(extension))
    .ok_or_else(not_found)?;

  let target = app_state.config.upload_dir.join(&folder).join(&file_name);
  match tokio::fs::read(&target).await {
    Ok(bytes) => Ok(HttpResponse::Ok().content_type(content_type).body(bytes)),
    Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(not_found()),
    Err(err) => Err(AppError::Domain(covenant::CovenantError::upstream(err))),
  }
}
