// covenant_server/src/services/auth_service.rs

//! Admin authentication: a pluggable credential policy plus bearer sessions.

use crate::errors::AppError;
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use rand_core::RngCore;
use std::collections::HashMap;
use tracing::{debug, error, info, instrument};

/// Decides whether a username/password pair may open an admin session.
pub trait AuthPolicy: Send + Sync {
  fn authenticate(&self, username: &str, password: &str) -> Result<bool, AppError>;
}

/// The single configured admin account. Only an argon2 hash of the password is kept.
pub struct CredentialPolicy {
  username: String,
  password_hash: String,
}

impl CredentialPolicy {
  pub fn new(username: &str, password: &str) -> Result<Self, AppError> {
    if username.trim().is_empty() {
      return Err(AppError::Config("Admin username cannot be empty.".to_string()));
    }
    Ok(Self {
      username: username.to_string(),
      password_hash: hash_password(password)?,
    })
  }
}

impl AuthPolicy for CredentialPolicy {
  #[instrument(name = "auth_service::authenticate", skip(self, password), fields(username = %username))]
  fn authenticate(&self, username: &str, password: &str) -> Result<bool, AppError> {
    if password.is_empty() {
      return Ok(false);
    }
    // Verify even on a username mismatch so both failures cost the same.
    let password_ok = verify_password(&self.password_hash, password)?;
    Ok(password_ok && username == self.username)
  }
}

/// Hashes a plain-text password using Argon2 with a fresh random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    return Err(AppError::validation("Password cannot be empty for hashing."));
  }

  let salt = SaltString::generate(&mut OsRng);
  match Argon2::default().hash_password(password.as_bytes(), &salt) {
    Ok(hash) => Ok(hash.to_string()),
    Err(argon_err) => {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      Err(AppError::Internal(format!("Password hashing process failed: {}", argon_err)))
    }
  }
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
#[instrument(name = "auth_service::verify_password", skip_all, err(Display))]
pub fn verify_password(hashed_password_str: &str, provided_password: &str) -> Result<bool, AppError> {
  let parsed_hash = PasswordHash::new(hashed_password_str).map_err(|parse_err| {
    error!(error = %parse_err, "Failed to parse stored password hash string.");
    AppError::Internal(format!("Invalid stored password hash format: {}", parse_err))
  })?;

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password verification failed: passwords do not match.");
      Ok(false)
    }
    Err(other) => {
      error!(error = %other, "Argon2 password verification process encountered an error.");
      Err(AppError::Internal(format!("Password verification process failed: {}", other)))
    }
  }
}

#[derive(Debug, Clone)]
pub struct AdminSessionInfo {
  pub token: String,
  pub username: String,
  pub expires_at: DateTime<Utc>,
}

/// Opaque bearer tokens for signed-in admins. Expired entries are dropped lazily.
pub struct SessionRegistry {
  ttl: Duration,
  sessions: RwLock<HashMap<String, AdminSessionInfo>>,
}

impl SessionRegistry {
  pub fn new(ttl: Duration) -> Self {
    Self {
      ttl,
      sessions: RwLock::new(HashMap::new()),
    }
  }

  #[instrument(name = "auth_service::issue_session", skip(self))]
  pub fn issue(&self, username: &str) -> AdminSessionInfo {
    let mut raw = [0u8; 32];
    OsRng.fill_bytes(&mut raw);
    let token: String = raw.iter().map(|b| format!("{:02x}", b)).collect();
    let session = AdminSessionInfo {
      token: token.clone(),
      username: username.to_string(),
      expires_at: Utc::now() + self.ttl,
    };

    let mut sessions = self.sessions.write();
    let now = Utc::now();
    sessions.retain(|_, s| s.expires_at > now);
    sessions.insert(token, session.clone());
    info!(expires_at = %session.expires_at, "Admin session issued.");
    session
  }

  /// The live session for `token`, if any.
  pub fn validate(&self, token: &str) -> Option<AdminSessionInfo> {
    let now = Utc::now();
    {
      let sessions = self.sessions.read();
      match sessions.get(token) {
        Some(session) if session.expires_at > now => return Some(session.clone()),
        Some(_) => {}
        None => return None,
      }
    }
    self.sessions.write().remove(token);
    debug!("Expired admin session removed.");
    None
  }

  /// Returns whether a session was removed.
  pub fn revoke(&self, token: &str) -> bool {
    self.sessions.write().remove(token).is_some()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn credential_policy_accepts_only_configured_pair() {
    let policy = CredentialPolicy::new("keeper", "correct horse battery").unwrap();
    assert!(policy.authenticate("keeper", "correct horse battery").unwrap());
    assert!(!policy.authenticate("keeper", "wrong").unwrap());
    assert!(!policy.authenticate("intruder", "correct horse battery").unwrap());
    assert!(!policy.authenticate("keeper", "").unwrap());
  }

  #[test]
  fn hash_is_salted() {
    let a = hash_password("same-secret").unwrap();
    let b = hash_password("same-secret").unwrap();
    assert_ne!(a, b);
    assert!(verify_password(&a, "same-secret").unwrap());
    assert!(verify_password(&b, "same-secret").unwrap());
  }

  #[test]
  fn garbage_hash_is_internal_error() {
    assert!(matches!(verify_password("not-a-phc-string", "x"), Err(AppError::Internal(_))));
  }

  #[test]
  fn sessions_validate_until_revoked_or_expired() {
    let registry = SessionRegistry::new(Duration::minutes(5));
    let session = registry.issue("keeper");
    assert_eq!(session.token.len(), 64);
    assert_eq!(registry.validate(&session.token).unwrap().username, "keeper");
    assert!(registry.revoke(&session.token));
    assert!(registry.validate(&session.token).is_none());
    assert!(!registry.revoke(&session.token));

    let expired = SessionRegistry::new(Duration::seconds(-1));
    let stale = expired.issue("keeper");
    assert!(expired.validate(&stale.token).is_none());
  }
}
