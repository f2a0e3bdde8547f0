//! Security concerns: structured audit events and admin sessions.

pub mod audit;
pub mod session;

pub use audit::{audit_log, AuditDetails, AuditEvent, AuditEventType};
pub use session::{
    password_digest, session_duration, AdminDirectory, AdminUser, Authenticator, Session,
    SESSION_DURATION_HOURS,
};
