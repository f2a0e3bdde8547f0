//! Pure reporting aggregations over members and the payment ledger.
//!
//! Everything here is computed from rows the caller already fetched; nothing
//! touches storage. Revenue figures use the recorded payment amount (what was
//! actually taken), with the discount column kept for display only.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    lifecycle::{classify_payment, PaymentCategory},
    member::{Member, MemberId, MemberStatus, PaymentRecord},
};

/// Revenue totals split by payment category.
///
/// Period filtering is the caller's job: pass the slice of payments for the
/// period being reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueBreakdown {
    /// Sum of every payment amount.
    pub total: Decimal,
    /// Revenue from payments made on the payer's join day.
    pub new_member: Decimal,
    /// Number of new-member payments.
    pub new_member_count: usize,
    /// Revenue from all other payments.
    pub renewal: Decimal,
    /// Number of renewal payments.
    pub renewal_count: usize,
}

/// Revenue taken in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1 through 12.
    pub month: u32,
    /// Sum of payment amounts in that month.
    pub revenue: Decimal,
}

/// Splits ledger revenue into new-member and renewal buckets.
///
/// Each payment is classified against the payer's join date. A payment whose
/// member no longer exists (the member row was deleted; ledger rows survive)
/// counts as renewal revenue, since only a member's first-day payment can be
/// new-member revenue and that distinction is lost with the row.
#[must_use]
pub fn revenue_breakdown(payments: &[PaymentRecord], members: &[Member]) -> RevenueBreakdown {
    let join_dates: HashMap<&MemberId, DateTime<Utc>> =
        members.iter().map(|m| (&m.id, m.join_date)).collect();

    let mut breakdown = RevenueBreakdown {
        total: Decimal::ZERO,
        new_member: Decimal::ZERO,
        new_member_count: 0,
        renewal: Decimal::ZERO,
        renewal_count: 0,
    };
    for payment in payments {
        breakdown.total += payment.amount;
        let category = join_dates
            .get(&payment.member_id)
            .map_or(PaymentCategory::Renewal, |join| classify_payment(payment.paid_at, *join));
        match category {
            PaymentCategory::NewMember => {
                breakdown.new_member += payment.amount;
                breakdown.new_member_count += 1;
            }
            PaymentCategory::Renewal => {
                breakdown.renewal += payment.amount;
                breakdown.renewal_count += 1;
            }
        }
    }
    breakdown
}

/// Counts members per package name, ordered by package name.
#[must_use]
pub fn members_by_package(members: &[Member]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for member in members {
        *counts.entry(member.package.clone()).or_insert(0) += 1;
    }
    counts
}

/// Active members whose subscription ends within the next `days` days.
///
/// Selects end dates in `[now, now + days)`: already-lapsed members belong to
/// the sweep, not this list. Sorted soonest-ending first. This backs the
/// dashboard's "expiring this week" panel with `days = 7`.
#[must_use]
pub fn expiring_within(members: &[Member], now: DateTime<Utc>, days: i64) -> Vec<Member> {
    let cutoff = now + Duration::days(days);
    let mut expiring: Vec<Member> = members
        .iter()
        .filter(|m| {
            m.status == MemberStatus::Active
                && m.subscription_end_date.is_some_and(|end| end >= now && end < cutoff)
        })
        .cloned()
        .collect();
    expiring.sort_by_key(|m| m.subscription_end_date);
    expiring
}

/// Revenue per calendar month for the last `months_back` months, oldest
/// first. The month containing `now` is always the final entry; months with
/// no payments appear with zero revenue.
#[must_use]
pub fn monthly_revenue(
    payments: &[PaymentRecord],
    now: DateTime<Utc>,
    months_back: u32,
) -> Vec<MonthlyRevenue> {
    let mut months: Vec<MonthlyRevenue> = Vec::new();
    let mut year = now.year();
    let mut month = now.month();
    for _ in 0..months_back {
        months.push(MonthlyRevenue { year, month, revenue: Decimal::ZERO });
        if month == 1 {
            year -= 1;
            month = 12;
        } else {
            month -= 1;
        }
    }
    months.reverse();

    for payment in payments {
        let paid = payment.paid_at;
        if let Some(entry) = months
            .iter_mut()
            .find(|m| m.year == paid.year() && m.month == paid.month())
        {
            entry.revenue += payment.amount;
        }
    }
    months
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::member::PaymentMethod;

    fn ts(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    fn member(id: &str, package: &str, join: DateTime<Utc>, end: DateTime<Utc>) -> Member {
        Member {
            id: MemberId::new(id).unwrap(),
            name: id.to_owned(),
            email: format!("{id}@example.com"),
            phone: None,
            package: package.to_owned(),
            status: MemberStatus::Active,
            join_date: join,
            subscription_start_date: Some(join),
            subscription_end_date: Some(end),
        }
    }

    fn payment(id: &str, amount: i64, paid_at: DateTime<Utc>) -> PaymentRecord {
        PaymentRecord {
            member_id: MemberId::new(id).unwrap(),
            package: "Silver".to_owned(),
            amount: Decimal::new(amount, 0),
            discount: Decimal::ZERO,
            method: PaymentMethod::Cash,
            notes: None,
            recorded_by: "admin@gym.example".to_owned(),
            paid_at,
        }
    }

    #[test]
    fn test_revenue_breakdown_splits_by_join_day() {
        let members = vec![member("mem-1", "Silver", ts(2025, 1, 15), ts(2025, 2, 15))];
        let payments = vec![
            payment("mem-1", 2000, ts(2025, 1, 15)), // joined and paid same day
            payment("mem-1", 2000, ts(2025, 2, 15)), // renewal a month later
        ];

        let breakdown = revenue_breakdown(&payments, &members);
        assert_eq!(breakdown.total, Decimal::new(4000, 0));
        assert_eq!(breakdown.new_member, Decimal::new(2000, 0));
        assert_eq!(breakdown.new_member_count, 1);
        assert_eq!(breakdown.renewal, Decimal::new(2000, 0));
        assert_eq!(breakdown.renewal_count, 1);
    }

    #[test]
    fn test_revenue_from_deleted_member_counts_as_renewal() {
        let payments = vec![payment("mem-gone", 5000, ts(2025, 1, 15))];
        let breakdown = revenue_breakdown(&payments, &[]);
        assert_eq!(breakdown.renewal, Decimal::new(5000, 0));
        assert_eq!(breakdown.new_member, Decimal::ZERO);
    }

    #[test]
    fn test_members_by_package_counts() {
        let members = vec![
            member("mem-1", "Silver", ts(2025, 1, 1), ts(2025, 2, 1)),
            member("mem-2", "Gold", ts(2025, 1, 1), ts(2025, 4, 1)),
            member("mem-3", "Silver", ts(2025, 1, 1), ts(2025, 2, 1)),
        ];
        let counts = members_by_package(&members);
        assert_eq!(counts.get("Silver"), Some(&2));
        assert_eq!(counts.get("Gold"), Some(&1));
        assert_eq!(counts.get("Diamond"), None);
    }

    #[test]
    fn test_expiring_within_window_sorted() {
        let now = ts(2025, 2, 1);
        let members = vec![
            member("mem-later", "Silver", ts(2025, 1, 1), ts(2025, 2, 6)),
            member("mem-soon", "Silver", ts(2025, 1, 1), ts(2025, 2, 3)),
            member("mem-far", "Gold", ts(2025, 1, 1), ts(2025, 3, 1)),
        ];

        let expiring = expiring_within(&members, now, 7);
        let ids: Vec<&str> = expiring.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["mem-soon", "mem-later"]);
    }

    #[test]
    fn test_expiring_within_excludes_lapsed_and_non_active() {
        let now = ts(2025, 2, 1);
        let mut lapsed = member("mem-lapsed", "Silver", ts(2025, 1, 1), ts(2025, 1, 31));
        lapsed.status = MemberStatus::Active; // lapsed but not yet swept
        let mut inactive = member("mem-inactive", "Silver", ts(2025, 1, 1), ts(2025, 2, 3));
        inactive.status = MemberStatus::Inactive;

        let expiring = expiring_within(&[lapsed, inactive], now, 7);
        assert!(expiring.is_empty());
    }

    #[test]
    fn test_monthly_revenue_fills_gap_months() {
        let payments = vec![
            payment("mem-1", 2000, ts(2025, 1, 10)),
            payment("mem-2", 5000, ts(2025, 3, 5)),
            payment("mem-3", 1000, ts(2025, 3, 20)),
            payment("mem-old", 9000, ts(2024, 11, 1)), // outside the window
        ];

        let months = monthly_revenue(&payments, ts(2025, 3, 25), 3);
        assert_eq!(months.len(), 3);
        assert_eq!((months[0].year, months[0].month), (2025, 1));
        assert_eq!(months[0].revenue, Decimal::new(2000, 0));
        assert_eq!(months[1].revenue, Decimal::ZERO);
        assert_eq!((months[2].year, months[2].month), (2025, 3));
        assert_eq!(months[2].revenue, Decimal::new(6000, 0));
    }

    #[test]
    fn test_monthly_revenue_crosses_year_boundary() {
        let payments = vec![payment("mem-1", 2000, ts(2024, 12, 31))];
        let months = monthly_revenue(&payments, ts(2025, 1, 15), 2);
        assert_eq!((months[0].year, months[0].month), (2024, 12));
        assert_eq!(months[0].revenue, Decimal::new(2000, 0));
        assert_eq!((months[1].year, months[1].month), (2025, 1));
    }
}
