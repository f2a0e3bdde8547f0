//! Structured audit events for security-relevant operations.
//!
//! Separate from the persisted activity trail: these events go to `tracing`
//! with the target `"audit"` so operators can route them to a dedicated log
//! stream. Each event carries a unique correlation ID for tracking a request
//! across operations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chrono::{DateTime, Utc};

/// Types of auditable events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEventType {
    /// A new member was enrolled.
    MemberEnrolled,
    /// An existing membership was renewed.
    MembershipRenewed,
    /// A membership lapsed and was flipped to expired.
    MembershipExpired,
    /// An expiry sweep finished.
    SweepCompleted,
    /// A member record was edited or deleted by an administrator.
    MemberMutated,
    /// Admin login succeeded.
    LoginSucceeded,
    /// Admin login failed.
    LoginFailed,
}

/// Contextual details attached to an audit event.
///
/// Fields use `skip_serializing_if` so an event only carries what applies
/// to it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuditDetails {
    /// Member the event concerned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    /// Package involved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    /// Number of rows affected (sweeps).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Error message, if the operation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A single audit event.
///
/// # Examples
///
/// ```
/// use gymstrive_core::security::audit::{audit_log, AuditEvent, AuditEventType};
/// use chrono::Utc;
///
/// let event = AuditEvent::new(AuditEventType::MemberEnrolled, "admin@gym.example", Utc::now())
///     .with_member_id("mem-123")
///     .with_package("Gold");
/// audit_log(&event);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// What happened.
    pub event_type: AuditEventType,
    /// Who performed the action ("system" for the sweep).
    pub actor: String,
    /// Correlation ID for tracking across operations.
    pub request_id: Uuid,
    /// Contextual details.
    pub details: AuditDetails,
}

impl AuditEvent {
    /// Creates a new audit event with a fresh correlation ID.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn new(event_type: AuditEventType, actor: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            timestamp: now,
            event_type,
            actor: actor.into(),
            request_id: Uuid::new_v4(),
            details: AuditDetails::default(),
        }
    }

    /// Adds the member ID to details.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_member_id(mut self, id: impl Into<String>) -> Self {
        self.details.member_id = Some(id.into());
        self
    }

    /// Adds the package name to details.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.details.package = Some(package.into());
        self
    }

    /// Adds an affected-row count to details.
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.details.count = Some(count);
        self
    }

    /// Adds an error message to details.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.details.error = Some(error.into());
        self
    }
}

/// Logs an audit event to tracing with target `"audit"`.
pub fn audit_log(event: &AuditEvent) {
    tracing::info!(
        target: "audit",
        timestamp = %event.timestamp,
        event_type = ?event.event_type,
        actor = %event.actor,
        request_id = %event.request_id,
        details = ?event.details,
        "AUDIT"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_event_builder() {
        let now = Utc::now();
        let event = AuditEvent::new(AuditEventType::MembershipRenewed, "admin@gym.example", now)
            .with_member_id("mem-1")
            .with_package("Diamond")
            .with_count(1);

        assert_eq!(event.actor, "admin@gym.example");
        assert_eq!(event.timestamp, now);
        assert_eq!(event.details.member_id.as_deref(), Some("mem-1"));
        assert_eq!(event.details.package.as_deref(), Some("Diamond"));
        assert_eq!(event.details.count, Some(1));
        assert!(event.details.error.is_none());
    }

    #[test]
    fn test_audit_event_serialization_skips_empty_details() {
        let event = AuditEvent::new(AuditEventType::SweepCompleted, "system", Utc::now())
            .with_count(0);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("sweep_completed"));
        assert!(json.contains("\"count\":0"));
        assert!(!json.contains("member_id"));
        assert!(!json.contains("error"));
    }

    #[test]
    fn test_request_ids_are_unique() {
        let now = Utc::now();
        let a = AuditEvent::new(AuditEventType::LoginFailed, "x", now);
        let b = AuditEvent::new(AuditEventType::LoginFailed, "x", now);
        assert_ne!(a.request_id, b.request_id);
    }
}
