//! The subscription lifecycle engine.
//!
//! Pure computation over {caller-supplied now, package catalog, existing
//! subscription window}. Every operation is deterministic: the clock is an
//! argument, never read internally, and no I/O happens here. The engine
//! returns a plan; persisting it (member row, payment row, audit row) is the
//! job of the surrounding [`crate::service`] layer.
//!
//! # Month arithmetic
//!
//! Durations are added as calendar months via [`chrono::Months`], which
//! clamps day-of-month overflow to the last day of the target month:
//! Jan 31 + 1 month = Feb 28 (or Feb 29 in a leap year). This rule is
//! observable in renewal dates and is fixed here deliberately.

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    catalog::PackageCatalog,
    error::Result,
    member::{Member, MemberId, MemberStatus},
};

/// A computed subscription window.
///
/// Invariant: `end >= start` (package durations are at least one month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionTerm {
    /// Window start.
    pub start: DateTime<Utc>,
    /// Window end.
    pub end: DateTime<Utc>,
}

/// Revenue category of a payment.
///
/// Computed on the fly from the same-day heuristic in [`classify_payment`];
/// never stored on the payment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentCategory {
    /// First payment, taken on the member's join date.
    NewMember,
    /// Any later payment.
    Renewal,
}

/// Adds calendar months with chrono's clamp-to-last-day rule.
///
/// The fallback only triggers past chrono's representable range (year
/// 262142), which no real subscription reaches.
fn add_calendar_months(base: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    base.checked_add_months(Months::new(months)).unwrap_or(base)
}

/// Computes the subscription window for a brand-new membership.
///
/// `start = now`, `end = now + duration(package)` in calendar months. The
/// implied member status is `Active`.
///
/// # Errors
///
/// Returns [`crate::error::CoreError::UnknownPackage`] if `package_name` is
/// not in the catalog.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use gymstrive_core::{catalog::PackageCatalog, lifecycle::create_subscription};
///
/// let catalog = PackageCatalog::standard();
/// let now = Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap();
/// let term = create_subscription(&catalog, "Silver", now).unwrap();
/// assert_eq!(term.start, now);
/// assert_eq!(term.end, Utc.with_ymd_and_hms(2025, 2, 15, 10, 0, 0).unwrap());
/// ```
pub fn create_subscription(
    catalog: &PackageCatalog,
    package_name: &str,
    now: DateTime<Utc>,
) -> Result<SubscriptionTerm> {
    let package = catalog.lookup(package_name)?;
    Ok(SubscriptionTerm { start: now, end: add_calendar_months(now, package.duration_months) })
}

/// Computes the subscription window for a renewal.
///
/// The new window extends from the later of `now` and the current end date,
/// so renewing early never forfeits remaining time and renewing after expiry
/// starts fresh from today. The implied status is `Active` regardless of the
/// member's previous status: a renewal always reactivates.
///
/// # Errors
///
/// Returns [`crate::error::CoreError::UnknownPackage`] if `package_name` is
/// not in the catalog.
pub fn renew_subscription(
    catalog: &PackageCatalog,
    package_name: &str,
    now: DateTime<Utc>,
    current_end: Option<DateTime<Utc>>,
) -> Result<SubscriptionTerm> {
    let package = catalog.lookup(package_name)?;
    let base = match current_end {
        Some(end) if end > now => end,
        _ => now,
    };
    Ok(SubscriptionTerm { start: base, end: add_calendar_months(base, package.duration_months) })
}

/// Selects the members the expiry sweep should flip to `Expired`.
///
/// Picks every member that is currently `Active` with a subscription end
/// date strictly before `now`. Members already `Expired` (or `Inactive`) are
/// excluded by the status filter, which makes the sweep idempotent: a second
/// run over the updated set selects nobody. An empty result is the normal
/// case, not an error.
#[must_use]
pub fn sweep_expirations(members: &[Member], now: DateTime<Utc>) -> Vec<MemberId> {
    members
        .iter()
        .filter(|m| {
            m.status == MemberStatus::Active
                && m.subscription_end_date.is_some_and(|end| end < now)
        })
        .map(|m| m.id.clone())
        .collect()
}

/// Whole days remaining until `end`, never negative.
///
/// `ceil((end - now) / 1 day)`, clamped to 0 when `end <= now`: an expired
/// membership shows 0 days left, not a negative count.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use gymstrive_core::lifecycle::days_remaining;
///
/// let now = Utc.with_ymd_and_hms(2025, 2, 26, 0, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
/// assert_eq!(days_remaining(end, now), 3);
/// ```
#[must_use]
pub fn days_remaining(end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
    let millis = (end - now).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

/// Classifies a payment as a new-member payment or a renewal.
///
/// A payment counts as `NewMember` when it falls on the same calendar day
/// (year, month, day in UTC, not the exact timestamp) as the member's join
/// date. This is a heuristic, not a stored fact: a renewal taken on the
/// member's join-date anniversary would misclassify. Kept as-is on purpose.
#[must_use]
pub fn classify_payment(paid_at: DateTime<Utc>, join_date: DateTime<Utc>) -> PaymentCategory {
    if paid_at.date_naive() == join_date.date_naive() {
        PaymentCategory::NewMember
    } else {
        PaymentCategory::Renewal
    }
}
