//! Membership service: commits lifecycle engine plans to storage.
//!
//! The engine computes subscription windows; this layer owns the write
//! protocol around them. Each operation treats its writes as one logical
//! transaction with the member row authoritative: if the member write fails
//! the operation fails, while payment-ledger and activity-trail appends are
//! best-effort and only logged on failure (the original admin dashboard
//! behaves the same way).
//!
//! Every operation takes an explicit [`Session`] for the actor's identity
//! and rejects expired sessions before doing anything else.

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::{
    catalog::PackageCatalog,
    error::{CoreError, Result},
    lifecycle::{create_subscription, renew_subscription, sweep_expirations},
    member::{
        ActivityEntry, ActivityKind, Member, MemberId, MemberStatus, PaymentMethod, PaymentRecord,
    },
    security::audit::{audit_log, AuditEvent, AuditEventType},
    security::session::Session,
    store::traits::{AuditTrail, Clock, MemberStore, PaymentLedger},
};

/// Actor recorded for sweep-generated activity entries.
const SYSTEM_ACTOR: &str = "system";

/// Parameters for enrolling a new member.
#[derive(Debug, Clone)]
pub struct NewMemberParams {
    /// Identifier for the new member row.
    pub member_id: MemberId,
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number, if provided.
    pub phone: Option<String>,
    /// Package name (must exist in the catalog).
    pub package: String,
    /// Gross amount paid.
    pub amount: Decimal,
    /// Discount applied, zero when none.
    pub discount: Decimal,
    /// Payment method.
    pub method: PaymentMethod,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Parameters for renewing an existing membership.
#[derive(Debug, Clone)]
pub struct RenewalParams {
    /// Package name (must exist in the catalog; may differ from the current
    /// package).
    pub package: String,
    /// Gross amount paid.
    pub amount: Decimal,
    /// Discount applied, zero when none.
    pub discount: Decimal,
    /// Payment method.
    pub method: PaymentMethod,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Orchestrates lifecycle transitions against the storage collaborators.
#[derive(Debug)]
pub struct MembershipService<S, L, A, C> {
    members: S,
    ledger: L,
    audit: A,
    clock: C,
    catalog: PackageCatalog,
}

impl<S, L, A, C> MembershipService<S, L, A, C>
where
    S: MemberStore,
    L: PaymentLedger,
    A: AuditTrail,
    C: Clock,
{
    /// Creates a service over the standard package catalog.
    pub fn new(members: S, ledger: L, audit: A, clock: C) -> Self {
        Self::with_catalog(members, ledger, audit, clock, PackageCatalog::standard())
    }

    /// Creates a service over an explicit catalog.
    pub fn with_catalog(
        members: S,
        ledger: L,
        audit: A,
        clock: C,
        catalog: PackageCatalog,
    ) -> Self {
        Self { members, ledger, audit, clock, catalog }
    }

    /// Returns the catalog this service validates packages against.
    #[must_use]
    pub fn catalog(&self) -> &PackageCatalog {
        &self.catalog
    }

    /// Enrolls a new member with an initial subscription and payment.
    ///
    /// Validation (package name, amounts, session) happens before any write.
    /// The member insert is authoritative; the payment and activity rows are
    /// appended best-effort afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownPackage`], [`CoreError::InvalidAmount`],
    /// [`CoreError::SessionExpired`], or a storage error from the member
    /// insert.
    pub fn enroll(&self, session: &Session, params: NewMemberParams) -> Result<Member> {
        let now = self.clock.now();
        session.require_valid(now)?;
        validate_payment(params.amount, params.discount)?;

        let term = create_subscription(&self.catalog, &params.package, now)?;

        let member = Member {
            id: params.member_id,
            name: params.name,
            email: params.email,
            phone: params.phone,
            package: params.package,
            status: MemberStatus::Active,
            join_date: now,
            subscription_start_date: Some(term.start),
            subscription_end_date: Some(term.end),
        };
        self.members.insert(member.clone())?;

        self.append_payment(PaymentRecord {
            member_id: member.id.clone(),
            package: member.package.clone(),
            amount: params.amount,
            discount: params.discount,
            method: params.method,
            notes: params.notes,
            recorded_by: session.actor_email.clone(),
            paid_at: now,
        });
        self.append_activity(ActivityEntry {
            kind: ActivityKind::Add,
            description: format!(
                "{} added new member {} with {} package",
                session.actor_name, member.name, member.package
            ),
            performed_by: session.actor_email.clone(),
            member_id: Some(member.id.clone()),
            at: now,
        });

        audit_log(
            &AuditEvent::new(AuditEventType::MemberEnrolled, &session.actor_email, now)
                .with_member_id(member.id.as_str())
                .with_package(&member.package),
        );
        info!(member_id = %member.id, package = %member.package, "member enrolled");
        Ok(member)
    }

    /// Renews a member's subscription, reactivating an expired membership.
    ///
    /// The new window extends from the later of now and the current end
    /// date. The member-row update is a compare-and-set against the end date
    /// observed here, so a renewal committed by another administrator in
    /// between surfaces as [`CoreError::ConcurrentUpdate`] instead of being
    /// silently overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MemberNotFound`], [`CoreError::UnknownPackage`],
    /// [`CoreError::InvalidAmount`], [`CoreError::SessionExpired`],
    /// [`CoreError::ConcurrentUpdate`], or a storage error.
    pub fn renew(
        &self,
        session: &Session,
        member_id: &MemberId,
        params: RenewalParams,
    ) -> Result<Member> {
        let now = self.clock.now();
        session.require_valid(now)?;
        validate_payment(params.amount, params.discount)?;

        let member = self
            .members
            .fetch(member_id)?
            .ok_or_else(|| CoreError::MemberNotFound(member_id.to_string()))?;

        let term =
            renew_subscription(&self.catalog, &params.package, now, member.subscription_end_date)?;

        // A renewal always reactivates, whatever the previous status was.
        self.members.update_subscription(
            member_id,
            member.subscription_end_date,
            &params.package,
            MemberStatus::Active,
            term,
        )?;

        self.append_payment(PaymentRecord {
            member_id: member_id.clone(),
            package: params.package.clone(),
            amount: params.amount,
            discount: params.discount,
            method: params.method,
            notes: params.notes,
            recorded_by: session.actor_email.clone(),
            paid_at: now,
        });
        self.append_activity(ActivityEntry {
            kind: ActivityKind::Renewal,
            description: format!(
                "{} renewed {}'s membership with {} package",
                session.actor_name, member.name, params.package
            ),
            performed_by: session.actor_email.clone(),
            member_id: Some(member_id.clone()),
            at: now,
        });

        audit_log(
            &AuditEvent::new(AuditEventType::MembershipRenewed, &session.actor_email, now)
                .with_member_id(member_id.as_str())
                .with_package(&params.package),
        );
        info!(member_id = %member_id, package = %params.package, "membership renewed");

        Ok(Member {
            package: params.package,
            status: MemberStatus::Active,
            subscription_start_date: Some(term.start),
            subscription_end_date: Some(term.end),
            ..member
        })
    }

    /// Flips every Active member whose end date has passed to Expired.
    ///
    /// Idempotent: members already Expired are excluded by the status
    /// filter, so an immediate second run selects nobody. Each transition
    /// emits one `status_change` activity entry attributed to the system
    /// actor. An empty sweep is the normal case.
    ///
    /// # Errors
    ///
    /// Returns a storage error if listing or a status update fails.
    pub fn run_expiry_sweep(&self) -> Result<Vec<MemberId>> {
        let now = self.clock.now();
        let candidates = self.members.list_active_ending_before(now)?;
        let due = sweep_expirations(&candidates, now);

        for member_id in &due {
            self.members.set_status(member_id, MemberStatus::Expired)?;
            self.append_activity(ActivityEntry {
                kind: ActivityKind::StatusChange,
                description: "Membership expired automatically".to_owned(),
                performed_by: SYSTEM_ACTOR.to_owned(),
                member_id: Some(member_id.clone()),
                at: now,
            });
            audit_log(
                &AuditEvent::new(AuditEventType::MembershipExpired, SYSTEM_ACTOR, now)
                    .with_member_id(member_id.as_str()),
            );
        }

        audit_log(
            &AuditEvent::new(AuditEventType::SweepCompleted, SYSTEM_ACTOR, now)
                .with_count(due.len()),
        );
        info!(expired = due.len(), "expiry sweep completed");
        Ok(due)
    }

    /// Administrative status override (for example suspending a member).
    ///
    /// The subscription window is left untouched; only the engine may move
    /// dates. Emits a `status_change` activity entry naming the actor.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SessionExpired`], [`CoreError::MemberNotFound`],
    /// or a storage error.
    pub fn override_status(
        &self,
        session: &Session,
        member_id: &MemberId,
        status: MemberStatus,
    ) -> Result<()> {
        let now = self.clock.now();
        session.require_valid(now)?;

        let member = self
            .members
            .fetch(member_id)?
            .ok_or_else(|| CoreError::MemberNotFound(member_id.to_string()))?;
        self.members.set_status(member_id, status)?;

        self.append_activity(ActivityEntry {
            kind: ActivityKind::StatusChange,
            description: format!(
                "{} changed {}'s status to {}",
                session.actor_name,
                member.name,
                status_label(status)
            ),
            performed_by: session.actor_email.clone(),
            member_id: Some(member_id.clone()),
            at: now,
        });
        audit_log(
            &AuditEvent::new(AuditEventType::MemberMutated, &session.actor_email, now)
                .with_member_id(member_id.as_str()),
        );
        Ok(())
    }

    /// Updates a member's contact details.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SessionExpired`], [`CoreError::MemberNotFound`],
    /// or a storage error.
    pub fn update_contact(
        &self,
        session: &Session,
        member_id: &MemberId,
        name: &str,
        email: &str,
        phone: Option<&str>,
    ) -> Result<()> {
        let now = self.clock.now();
        session.require_valid(now)?;

        self.members.update_contact(member_id, name, email, phone)?;
        self.append_activity(ActivityEntry {
            kind: ActivityKind::Edit,
            description: format!("{} updated contact details for {name}", session.actor_name),
            performed_by: session.actor_email.clone(),
            member_id: Some(member_id.clone()),
            at: now,
        });
        audit_log(
            &AuditEvent::new(AuditEventType::MemberMutated, &session.actor_email, now)
                .with_member_id(member_id.as_str()),
        );
        Ok(())
    }

    /// Deletes a member record.
    ///
    /// The payment ledger and activity trail keep their rows: both are
    /// append-only.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SessionExpired`], [`CoreError::MemberNotFound`],
    /// or a storage error.
    pub fn delete_member(&self, session: &Session, member_id: &MemberId) -> Result<()> {
        let now = self.clock.now();
        session.require_valid(now)?;

        let member = self
            .members
            .fetch(member_id)?
            .ok_or_else(|| CoreError::MemberNotFound(member_id.to_string()))?;
        self.members.remove(member_id)?;

        self.append_activity(ActivityEntry {
            kind: ActivityKind::Delete,
            description: format!("{} deleted member {}", session.actor_name, member.name),
            performed_by: session.actor_email.clone(),
            member_id: Some(member_id.clone()),
            at: now,
        });
        audit_log(
            &AuditEvent::new(AuditEventType::MemberMutated, &session.actor_email, now)
                .with_member_id(member_id.as_str()),
        );
        Ok(())
    }

    /// Best-effort payment append; the member row is already committed.
    fn append_payment(&self, record: PaymentRecord) {
        if let Err(error) = self.ledger.append(record) {
            warn!(%error, "payment ledger append failed after member write");
        }
    }

    /// Best-effort activity append; the member row is already committed.
    fn append_activity(&self, entry: ActivityEntry) {
        if let Err(error) = self.audit.append(entry) {
            warn!(%error, "activity trail append failed after member write");
        }
    }
}

fn validate_payment(amount: Decimal, discount: Decimal) -> Result<()> {
    if amount.is_sign_negative() {
        return Err(CoreError::InvalidAmount("amount cannot be negative".into()));
    }
    if discount.is_sign_negative() {
        return Err(CoreError::InvalidAmount("discount cannot be negative".into()));
    }
    if discount > amount {
        return Err(CoreError::InvalidAmount("discount cannot exceed the amount".into()));
    }
    Ok(())
}

fn status_label(status: MemberStatus) -> &'static str {
    match status {
        MemberStatus::Active => "Active",
        MemberStatus::Expired => "Expired",
        MemberStatus::Inactive => "Inactive",
    }
}
