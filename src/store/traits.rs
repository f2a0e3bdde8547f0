//! Storage and clock trait contracts.
//!
//! These are the engine's only boundary besides its function signatures.
//! Implementations wrap whatever backend holds the data; the service layer
//! never touches a row except through these traits.

use chrono::{DateTime, Utc};

use crate::{
    error::Result,
    lifecycle::SubscriptionTerm,
    member::{ActivityEntry, ContactSubmission, Member, MemberId, MemberStatus, PaymentRecord},
};

/// Member row storage.
///
/// The subscription window and status are written only through
/// [`update_subscription`](MemberStore::update_subscription) and
/// [`set_status`](MemberStore::set_status), keeping the lifecycle engine the
/// single source of date mutations.
pub trait MemberStore: Send + Sync {
    /// Fetches a member by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails; an absent member is `Ok(None)`.
    fn fetch(&self, id: &MemberId) -> Result<Option<Member>>;

    /// Inserts a brand-new member row.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::CoreError::Storage`] if a row with the same ID
    /// already exists or the backend fails.
    fn insert(&self, member: Member) -> Result<()>;

    /// Applies a new subscription window and status to a member row,
    /// conditional on the previously observed end date.
    ///
    /// The compare-and-set on `expected_end` lets callers detect a
    /// duplicate-renewal race: if another administrator committed a renewal
    /// after this one was planned, the stored end date no longer matches and
    /// the update is rejected instead of silently overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::CoreError::ConcurrentUpdate`] on an end-date
    /// mismatch, [`crate::error::CoreError::MemberNotFound`] for an unknown
    /// ID, or [`crate::error::CoreError::Storage`] on backend failure.
    fn update_subscription(
        &self,
        id: &MemberId,
        expected_end: Option<DateTime<Utc>>,
        package: &str,
        status: MemberStatus,
        term: SubscriptionTerm,
    ) -> Result<()>;

    /// Sets a member's status without touching the subscription window.
    ///
    /// Used by the expiry sweep and by administrative overrides.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown ID or backend failure.
    fn set_status(&self, id: &MemberId, status: MemberStatus) -> Result<()>;

    /// Updates a member's contact details (name, email, phone).
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown ID or backend failure.
    fn update_contact(
        &self,
        id: &MemberId,
        name: &str,
        email: &str,
        phone: Option<&str>,
    ) -> Result<()>;

    /// Removes a member row.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown ID or backend failure.
    fn remove(&self, id: &MemberId) -> Result<()>;

    /// Lists members with status `Active` and an end date strictly before
    /// `cutoff`, ordered soonest-ending first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails; no matches is `Ok(vec![])`.
    fn list_active_ending_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<Member>>;
}

/// Append-only payment ledger.
pub trait PaymentLedger: Send + Sync {
    /// Appends one payment row. Rows are never updated or deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn append(&self, record: PaymentRecord) -> Result<()>;
}

/// Append-only activity trail.
pub trait AuditTrail: Send + Sync {
    /// Appends one activity entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn append(&self, entry: ActivityEntry) -> Result<()>;
}

/// Public-site contact submission inbox.
pub trait ContactInbox: Send + Sync {
    /// Stores a new submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn submit(&self, submission: ContactSubmission) -> Result<()>;

    /// Marks the submission at `index` as contacted.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown index or backend failure.
    fn mark_contacted(&self, index: usize) -> Result<()>;

    /// Lists all submissions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn list(&self) -> Result<Vec<ContactSubmission>>;
}

/// Source of "now".
///
/// Injected into the service layer so every lifecycle computation is
/// deterministic and testable; production code uses [`SystemClock`].
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock [`Clock`] implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
