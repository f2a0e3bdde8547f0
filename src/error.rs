//! Error types for the membership core.
//!
//! All errors implement the standard [`std::error::Error`] trait via
//! [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Validation errors** ([`CoreError::UnknownPackage`],
//!   [`CoreError::InvalidMemberId`], [`CoreError::InvalidAmount`]): rejected
//!   input; callers surface these as user-facing validation messages and must
//!   not persist a partial record.
//! - **Conflict errors** ([`CoreError::ConcurrentUpdate`]): a compare-and-set
//!   on the member row failed because another administrator changed the
//!   subscription window first.
//! - **Authentication errors** ([`CoreError::InvalidCredentials`],
//!   [`CoreError::SessionExpired`]): login or session failures.
//! - **Storage errors** ([`CoreError::Storage`]): the persistence collaborator
//!   reported a failure.
//!
//! # Examples
//!
//! ```
//! use gymstrive_core::error::{CoreError, Result};
//!
//! fn require_package(name: &str) -> Result<()> {
//!     if name.is_empty() {
//!         return Err(CoreError::UnknownPackage(name.to_owned()));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Result type alias for membership core operations.
///
/// This is a convenience type that uses [`CoreError`] as the error type.
/// All fallible functions in this crate return this type.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur in the membership core.
///
/// Error messages are designed to be user-facing and actionable. Validation
/// errors mean the operation was rejected before any write; storage errors
/// mean a collaborator failed while committing an already-computed plan.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum CoreError {
    /// A package name outside the fixed catalog was supplied.
    ///
    /// Raised by [`crate::catalog::PackageCatalog::lookup`] and therefore by
    /// every lifecycle operation that takes a package name. Callers must
    /// reject the operation rather than persist a member without an end date.
    #[error("unknown package: {0}")]
    UnknownPackage(String),

    /// A member identifier failed validation.
    ///
    /// Member IDs must be non-empty, at most 64 characters, and contain only
    /// alphanumeric characters, hyphens, and underscores.
    #[error("invalid member id: {0}")]
    InvalidMemberId(String),

    /// A payment amount or discount failed validation.
    ///
    /// Amounts and discounts must be non-negative and the discount may not
    /// exceed the amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// No member exists with the requested identifier.
    #[error("member not found: {0}")]
    MemberNotFound(String),

    /// A compare-and-set update of the member row failed.
    ///
    /// The subscription end date observed when the renewal was planned no
    /// longer matches the stored row, meaning another renewal committed in
    /// between. Re-fetch the member and retry the renewal.
    #[error("concurrent update detected for member: {0}")]
    ConcurrentUpdate(String),

    /// Login failed.
    ///
    /// The same message is used for an unknown email and a wrong password so
    /// the response does not reveal which admin accounts exist.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The supplied session is older than the fixed session duration.
    #[error("session expired")]
    SessionExpired,

    /// A storage collaborator failed.
    ///
    /// Wraps the message from the member store, payment ledger, or audit
    /// trail. Whether the operation is retryable depends on the backend.
    #[error("storage operation failed: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_package_display() {
        let error = CoreError::UnknownPackage("Platinum".to_owned());
        assert_eq!(error.to_string(), "unknown package: Platinum");
    }

    #[test]
    fn test_invalid_credentials_does_not_leak_detail() {
        let error = CoreError::InvalidCredentials;
        assert_eq!(error.to_string(), "invalid email or password");
    }

    #[test]
    fn test_concurrent_update_display() {
        let error = CoreError::ConcurrentUpdate("mem-42".to_owned());
        assert!(error.to_string().contains("mem-42"));
    }
}
