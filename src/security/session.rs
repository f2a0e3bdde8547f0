//! Admin authentication and explicit session objects.
//!
//! Sessions are plain values handed to whatever component needs the current
//! actor's identity. There is no ambient lookup: a caller that needs the
//! actor receives a [`Session`] as an argument, and expiry is checked by
//! comparing the stored issue time against [`session_duration`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{
    error::{CoreError, Result},
    security::audit::{audit_log, AuditEvent, AuditEventType},
};

/// Fixed admin session lifetime in hours.
pub const SESSION_DURATION_HOURS: i64 = 8;

/// Fixed admin session lifetime as a [`Duration`].
#[must_use]
pub fn session_duration() -> Duration {
    Duration::hours(SESSION_DURATION_HOURS)
}

/// An authenticated admin session.
///
/// Expires [`SESSION_DURATION_HOURS`] hours after issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Email of the authenticated administrator.
    pub actor_email: String,
    /// Display name of the administrator.
    pub actor_name: String,
    /// When the session was issued.
    pub issued_at: DateTime<Utc>,
}

impl Session {
    /// Returns true if the session is older than the fixed session duration.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.issued_at > session_duration()
    }

    /// Errors with [`CoreError::SessionExpired`] if the session has lapsed.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SessionExpired`] when `now` is more than the
    /// session duration past the issue time.
    pub fn require_valid(&self, now: DateTime<Utc>) -> Result<()> {
        if self.is_expired(now) {
            return Err(CoreError::SessionExpired);
        }
        Ok(())
    }
}

/// Stored admin account row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// SHA-256 hex digest of the password.
    pub password_digest: String,
}

/// Lookup contract for admin accounts.
pub trait AdminDirectory: Send + Sync {
    /// Fetches an admin account by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails; an unknown email is `Ok(None)`.
    fn lookup(&self, email: &str) -> Result<Option<AdminUser>>;
}

impl AdminDirectory for Vec<AdminUser> {
    fn lookup(&self, email: &str) -> Result<Option<AdminUser>> {
        Ok(self.iter().find(|a| a.email == email).cloned())
    }
}

/// Computes the SHA-256 hex digest of a password.
///
/// # Examples
///
/// ```
/// use gymstrive_core::security::session::password_digest;
///
/// let digest = password_digest("hunter2");
/// assert_eq!(digest.len(), 64);
/// ```
#[must_use]
pub fn password_digest(plain: &str) -> String {
    let digest = Sha256::digest(plain.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Verifies credentials against a directory and issues sessions.
#[derive(Debug)]
pub struct Authenticator<D> {
    directory: D,
}

impl<D: AdminDirectory> Authenticator<D> {
    /// Creates an authenticator over the given directory.
    #[must_use]
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    /// Verifies `email`/`password` and issues a session stamped `now`.
    ///
    /// The same [`CoreError::InvalidCredentials`] is returned for an unknown
    /// email and a wrong password, so the response does not reveal which
    /// admin accounts exist.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCredentials`] on mismatch or a storage
    /// error from the directory.
    pub fn login(&self, email: &str, password: &str, now: DateTime<Utc>) -> Result<Session> {
        let Some(admin) = self.directory.lookup(email)? else {
            audit_log(&AuditEvent::new(AuditEventType::LoginFailed, email, now));
            return Err(CoreError::InvalidCredentials);
        };

        if admin.password_digest != password_digest(password) {
            audit_log(&AuditEvent::new(AuditEventType::LoginFailed, email, now));
            return Err(CoreError::InvalidCredentials);
        }

        audit_log(&AuditEvent::new(AuditEventType::LoginSucceeded, email, now));
        Ok(Session { actor_email: admin.email, actor_name: admin.name, issued_at: now })
    }
}
