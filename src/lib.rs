//! Gym Membership Subscription Core
//!
//! The subscription lifecycle engine behind a gym admin dashboard: a fixed
//! package catalog (Silver, Gold, Diamond), calendar-month subscription
//! windows, early and late renewals, a batch expiry sweep, and payment
//! classification for revenue reporting.
//!
//! # Overview
//!
//! The engine itself ([`lifecycle`]) is pure: it takes timestamps and a
//! catalog and returns subscription windows without touching storage. The
//! [`service`] layer commits those windows through the storage contracts in
//! [`store`], treating the member row as authoritative and the payment
//! ledger and activity trail as best-effort. Admin authentication and
//! structured audit events live in [`security`]; read-side aggregations in
//! [`reports`].
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use gymstrive_core::{
//!     catalog::PackageCatalog,
//!     lifecycle::{create_subscription, days_remaining},
//! };
//!
//! # fn example() -> gymstrive_core::error::Result<()> {
//! let catalog = PackageCatalog::standard();
//! let now = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
//!
//! // A Silver membership runs one calendar month.
//! let term = create_subscription(&catalog, "Silver", now)?;
//! assert_eq!(term.end, Utc.with_ymd_and_hms(2025, 2, 15, 0, 0, 0).unwrap());
//! assert_eq!(days_remaining(term.end, now), 31);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod error;
pub mod lifecycle;
pub mod member;
pub mod reports;
pub mod security;
pub mod service;
pub mod store;

pub use catalog::{Package, PackageCatalog};
pub use error::{CoreError, Result};
pub use lifecycle::{PaymentCategory, SubscriptionTerm};
pub use member::{Member, MemberId, MemberStatus, PaymentMethod};
pub use service::{MembershipService, NewMemberParams, RenewalParams};
