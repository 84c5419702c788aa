//! # Role Directory Audit
//!
//! Bounded audit trail for role registrations, grants, revocations,
//! ownership transfers and gate decisions.

mod audit_logger;

pub use audit_logger::{AuditEntry, AuditEventType, AuditLogger, AuditStats};
