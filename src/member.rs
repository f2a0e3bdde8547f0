//! Member, payment, and activity-log data models.
//!
//! These mirror the rows the admin dashboard works with: the member record
//! whose status and subscription window are mutated only through lifecycle
//! operations, the append-only payment ledger, the append-only activity
//! trail, and public-site contact submissions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Unique identifier for a gym member.
///
/// Wraps the store-provided ID with type safety and validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(String);

impl MemberId {
    /// Creates a new member ID after validation.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidMemberId`] if the ID is empty, exceeds 64
    /// characters, or contains anything other than alphanumeric characters,
    /// hyphens, and underscores.
    pub fn new<S: Into<String>>(id: S) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(CoreError::InvalidMemberId("member id cannot be empty".into()));
        }
        if id.len() > 64 {
            return Err(CoreError::InvalidMemberId(
                "member id must be 64 characters or less".into(),
            ));
        }
        if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(CoreError::InvalidMemberId(
                "member id can only contain alphanumeric characters, hyphens, and underscores"
                    .into(),
            ));
        }
        Ok(Self(id))
    }

    /// Returns the inner string reference.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Membership status.
///
/// `Active` implies the subscription end date was in the future the last time
/// it was recomputed; a lapsed end date is reconciled by the expiry sweep
/// (eventual consistency, not continuous enforcement). The only automatic
/// transition is `Active` to `Expired`; reactivation happens solely through a
/// renewal, and `Inactive` is set only by administrative override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    /// Subscription is current (as of the last recomputation).
    Active,
    /// Subscription end date has passed and the sweep has flipped the row.
    Expired,
    /// Membership suspended by an administrator.
    Inactive,
}

/// A gym member record.
///
/// The status and subscription window are mutated only by lifecycle engine
/// outputs applied through the membership service, never by arbitrary edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Unique member identifier.
    pub id: MemberId,
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number, if provided.
    pub phone: Option<String>,
    /// Current package name (a key into the package catalog).
    pub package: String,
    /// Membership status.
    pub status: MemberStatus,
    /// When the member first joined. Used by payment classification.
    pub join_date: DateTime<Utc>,
    /// Start of the current subscription window.
    pub subscription_start_date: Option<DateTime<Utc>>,
    /// End of the current subscription window. Always >= the start date when
    /// both are set.
    pub subscription_end_date: Option<DateTime<Utc>>,
}

/// Payment method accepted at the front desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash payment.
    Cash,
    /// Bank transfer.
    Bank,
}

/// An immutable payment ledger row.
///
/// One row is appended per lifecycle transaction (enrollment or renewal);
/// rows are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// The paying member.
    pub member_id: MemberId,
    /// Package purchased.
    pub package: String,
    /// Gross amount paid (Rs).
    pub amount: Decimal,
    /// Discount applied (Rs), zero when none.
    pub discount: Decimal,
    /// How the payment was made.
    pub method: PaymentMethod,
    /// Free-text notes, if any.
    pub notes: Option<String>,
    /// Identity of the administrator who recorded the payment.
    pub recorded_by: String,
    /// When the payment was taken.
    pub paid_at: DateTime<Utc>,
}

/// Kind of activity-trail entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// A new member was added.
    Add,
    /// An existing membership was renewed.
    Renewal,
    /// A member's status changed (sweep or administrative override).
    StatusChange,
    /// Member contact details were edited.
    Edit,
    /// A member record was deleted.
    Delete,
}

/// An append-only activity-trail entry, one per lifecycle transition or
/// administrative mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// What happened.
    pub kind: ActivityKind,
    /// Human-readable description of the action.
    pub description: String,
    /// Identity of the actor ("system" for the expiry sweep).
    pub performed_by: String,
    /// Member the action concerned, if any.
    pub member_id: Option<MemberId>,
    /// When the action happened.
    pub at: DateTime<Utc>,
}

/// A package inquiry submitted through the public marketing site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSubmission {
    /// Submitter name.
    pub name: String,
    /// Submitter email.
    pub email: String,
    /// Submitter phone, if provided.
    pub phone: Option<String>,
    /// Free-text message.
    pub message: String,
    /// Package the submitter asked about, if any.
    pub package: Option<String>,
    /// Whether an administrator has followed up.
    pub contacted: bool,
    /// When the form was submitted.
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // MemberId Tests
    // ========================================================================

    #[test]
    fn test_member_id_valid() {
        let id = MemberId::new("mem-123").unwrap();
        assert_eq!(id.as_str(), "mem-123");
    }

    #[test]
    fn test_member_id_empty_rejected() {
        let result = MemberId::new("");
        assert!(matches!(result.unwrap_err(), CoreError::InvalidMemberId(_)));
    }

    #[test]
    fn test_member_id_too_long_rejected() {
        let result = MemberId::new("a".repeat(65));
        assert!(matches!(result.unwrap_err(), CoreError::InvalidMemberId(_)));
    }

    #[test]
    fn test_member_id_exactly_64_chars_accepted() {
        let exactly_64 = "a".repeat(64);
        assert!(MemberId::new(exactly_64).is_ok());
    }

    #[test]
    fn test_member_id_rejects_special_chars() {
        assert!(MemberId::new("mem@123").is_err());
        assert!(MemberId::new("mem 123").is_err());
        assert!(MemberId::new("../etc/passwd").is_err());
    }

    #[test]
    fn test_member_id_display() {
        let id = MemberId::new("mem-7").unwrap();
        assert_eq!(id.to_string(), "mem-7");
    }

    // ========================================================================
    // Serialization Tests
    // ========================================================================

    #[test]
    fn test_member_status_serialization() {
        assert_eq!(serde_json::to_string(&MemberStatus::Active).unwrap(), "\"active\"");
        assert_eq!(serde_json::to_string(&MemberStatus::Expired).unwrap(), "\"expired\"");
        assert_eq!(serde_json::to_string(&MemberStatus::Inactive).unwrap(), "\"inactive\"");
    }

    #[test]
    fn test_activity_kind_serialization() {
        assert_eq!(serde_json::to_string(&ActivityKind::Add).unwrap(), "\"add\"");
        assert_eq!(
            serde_json::to_string(&ActivityKind::StatusChange).unwrap(),
            "\"status_change\""
        );
    }

    #[test]
    fn test_payment_method_deserialization() {
        let cash: PaymentMethod = serde_json::from_str("\"cash\"").unwrap();
        assert_eq!(cash, PaymentMethod::Cash);
        let bank: PaymentMethod = serde_json::from_str("\"bank\"").unwrap();
        assert_eq!(bank, PaymentMethod::Bank);
    }
}
