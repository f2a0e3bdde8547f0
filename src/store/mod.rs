//! Persistence collaborator contracts and the in-memory reference store.
//!
//! The lifecycle engine is pure; these traits are the seam to whatever
//! backend actually holds the rows. [`MemoryStore`] implements all of them
//! in-process and backs the test suite.

pub mod memory;
pub mod traits;

pub use memory::MemoryStore;
pub use traits::{AuditTrail, Clock, ContactInbox, MemberStore, PaymentLedger, SystemClock};
