//! AuditLogger - Audit trail of directory mutations and gate decisions

use serde::{Deserialize, Serialize};
use shared::DEFAULT_AUDIT_CAPACITY;
use std::collections::VecDeque;

/// Audit log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub timestamp: String,
    pub event_type: AuditEventType,
    /// Identity that performed or attempted the action
    pub actor: String,
    /// User whose memberships were touched or checked
    pub subject: Option<String>,
    pub role: Option<String>,
    pub success: bool,
    pub reason: Option<String>,
}

/// Types of audit events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    RoleRegistered,
    RoleGranted,
    RoleRevoked,
    AccessGranted,
    AccessDenied,
    OwnershipTransferred,
    AdminRejected,
}

/// Audit logger
#[derive(Debug)]
pub struct AuditLogger {
    entries: VecDeque<AuditEntry>,
    max_entries: usize,
}

impl AuditLogger {
    /// Create a new AuditLogger
    pub fn new(max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            entries: VecDeque::with_capacity(max_entries.min(1024)),
            max_entries,
        }
    }

    /// Rebuild a logger from previously exported entries (oldest first).
    ///
    /// Only the newest `max_entries` are kept.
    pub fn with_entries(max_entries: usize, entries: impl IntoIterator<Item = AuditEntry>) -> Self {
        let mut logger = Self::new(max_entries);
        for entry in entries {
            logger.log(entry);
        }
        logger
    }

    /// All retained entries, oldest first
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Log an audit entry, evicting the oldest when full
    pub fn log(&mut self, entry: AuditEntry) {
        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Log a role registration attempt
    pub fn log_role_registered(&mut self, actor: &str, role: &str, success: bool, reason: Option<&str>) {
        self.log(AuditEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            event_type: AuditEventType::RoleRegistered,
            actor: actor.to_string(),
            subject: None,
            role: Some(role.to_string()),
            success,
            reason: reason.map(|s| s.to_string()),
        });
    }

    /// Log a grant or revocation attempt
    pub fn log_membership_change(
        &mut self,
        actor: &str,
        subject: &str,
        role: &str,
        granted: bool,
        success: bool,
        reason: Option<&str>,
    ) {
        self.log(AuditEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            event_type: if granted { AuditEventType::RoleGranted } else { AuditEventType::RoleRevoked },
            actor: actor.to_string(),
            subject: Some(subject.to_string()),
            role: Some(role.to_string()),
            success,
            reason: reason.map(|s| s.to_string()),
        });
    }

    /// Log a gate decision
    pub fn log_access(&mut self, user: &str, role: &str, allowed: bool) {
        self.log(AuditEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            event_type: if allowed { AuditEventType::AccessGranted } else { AuditEventType::AccessDenied },
            actor: user.to_string(),
            subject: Some(user.to_string()),
            role: Some(role.to_string()),
            success: allowed,
            reason: None,
        });
    }

    /// Log an ownership transfer attempt
    pub fn log_ownership_transfer(&mut self, actor: &str, new_owner: &str, success: bool, reason: Option<&str>) {
        self.log(AuditEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            event_type: AuditEventType::OwnershipTransferred,
            actor: actor.to_string(),
            subject: Some(new_owner.to_string()),
            role: None,
            success,
            reason: reason.map(|s| s.to_string()),
        });
    }

    /// Log an administrative call rejected because the caller is not the owner
    pub fn log_admin_rejected(&mut self, actor: &str, action: &str) {
        self.log(AuditEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            event_type: AuditEventType::AdminRejected,
            actor: actor.to_string(),
            subject: None,
            role: None,
            success: false,
            reason: Some(format!("'{}' requires the owner", action)),
        });
    }

    /// Get recent entries, newest first
    pub fn get_recent(&self, limit: usize) -> Vec<&AuditEntry> {
        self.entries.iter().rev().take(limit).collect()
    }

    /// Get recent failures, newest first
    pub fn get_recent_denials(&self, limit: usize) -> Vec<&AuditEntry> {
        self.entries
            .iter()
            .rev()
            .filter(|e| !e.success)
            .take(limit)
            .collect()
    }

    /// Get statistics
    pub fn get_stats(&self) -> AuditStats {
        let total = self.entries.len();
        let denials = self.entries.iter().filter(|e| !e.success).count();

        AuditStats {
            total_entries: total,
            denial_count: denials,
        }
    }

    /// Export as JSON
    pub fn export_json(&self) -> serde_json::Value {
        serde_json::to_value(self.entries.iter().collect::<Vec<_>>()).unwrap_or_default()
    }
}

/// Audit statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditStats {
    pub total_entries: usize,
    pub denial_count: usize,
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::new(DEFAULT_AUDIT_CAPACITY)
    }
}
