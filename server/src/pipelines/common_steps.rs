// covenant_server/src/pipelines/common_steps.rs

use crate::errors::{AppError, Result as AppResult};
use crate::services::mailer::Mailer;
use crate::services::templates::Rendered;
use covenant::CovenantError;
use tracing::{info, instrument, warn};

/// Sends a rendered email and turns a failed delivery into an error, so a
/// best-effort step can report it.
#[instrument(name = "common_step::send_notification", skip(mailer, rendered), fields(subject = %rendered.subject))]
pub async fn send_notification(mailer: &dyn Mailer, to: &str, rendered: Rendered) -> AppResult<()> {
  let report = mailer.send(to, &rendered.subject, &rendered.html).await;
  if report.success {
    info!(message_id = ?report.message_id, "Notification sent.");
    return Ok(());
  }

  let reason = report.error.unwrap_or_else(|| "unknown delivery failure".to_string());
  warn!(%reason, "Notification could not be delivered.");
  Err(AppError::Domain(CovenantError::upstream(anyhow::anyhow!(
    "Mail delivery to {} failed: {}",
    to,
    reason
  ))))
}
