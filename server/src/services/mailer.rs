// covenant_server/src/services/mailer.rs

//! Outbound email. Delivery is best-effort: `send` reports failure in its
//! return value and never errors, so a notification can't sink the request
//! that triggered it.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReport {
  pub success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl DeliveryReport {
  pub fn delivered(message_id: String) -> Self {
    Self {
      success: true,
      message_id: Some(message_id),
      error: None,
    }
  }

  pub fn failed(error: impl Into<String>) -> Self {
    Self {
      success: false,
      message_id: None,
      error: Some(error.into()),
    }
  }
}

#[async_trait]
pub trait Mailer: Send + Sync {
  async fn send(&self, to: &str, subject: &str, html: &str) -> DeliveryReport;
}

#[derive(Debug, Clone)]
pub struct SentEmail {
  pub to: String,
  pub from: String,
  pub subject: String,
  pub html: String,
  pub message_id: String,
}

/// Logs every message instead of handing it to a transport. Only a mailer
/// built with [`LogMailer::with_outbox`] keeps copies of what was "sent".
pub struct LogMailer {
  sender: String,
  outbox: Option<Mutex<Vec<SentEmail>>>,
}

impl LogMailer {
  pub fn new(sender: impl Into<String>) -> Self {
    Self {
      sender: sender.into(),
      outbox: None,
    }
  }

  pub fn with_outbox(sender: impl Into<String>) -> Self {
    Self {
      sender: sender.into(),
      outbox: Some(Mutex::new(Vec::new())),
    }
  }

  /// Messages sent so far; always empty without an outbox.
  pub fn outbox(&self) -> Vec<SentEmail> {
    self.outbox.as_ref().map(|outbox| outbox.lock().clone()).unwrap_or_default()
  }
}

#[async_trait]
impl Mailer for LogMailer {
  #[instrument(name = "mailer::send", skip(self, html), fields(from = %self.sender))]
  async fn send(&self, to: &str, subject: &str, html: &str) -> DeliveryReport {
    if !to.contains('@') {
      warn!("Refusing to send email to malformed address.");
      return DeliveryReport::failed(format!("Malformed recipient address '{}'", to));
    }

    let message_id = format!("log_email_{}", uuid::Uuid::new_v4());
    let preview: String = html.chars().take(50).collect();
    info!(%message_id, body_preview = %preview, "Email logged for delivery.");

    if let Some(outbox) = &self.outbox {
      outbox.lock().push(SentEmail {
        to: to.to_string(),
        from: self.sender.clone(),
        subject: subject.to_string(),
        html: html.to_string(),
        message_id: message_id.clone(),
      });
    }
    DeliveryReport::delivered(message_id)
  }
}
