//! DirectoryAdmin - Owner-restricted administration of a RoleDirectory

use crate::directory::RoleDirectory;
use crate::ownable::Ownable;
use crate::secured::Secured;
use audit::{AuditEntry, AuditLogger, AuditStats};
use shared::{Identity, RbacError, Result, UserId, DEFAULT_AUDIT_CAPACITY};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Administrative surface over a shared directory.
///
/// Every mutation runs while the owner is locked: the owner check and the
/// directory operation form one step, and an ownership transfer cannot land
/// between them. Outcomes of both steps go to the audit trail.
#[derive(Debug)]
pub struct DirectoryAdmin<U = UserId> {
    ownership: Ownable<U>,
    directory: Arc<RoleDirectory<U>>,
    audit: Mutex<AuditLogger>,
}

impl<U: Identity> DirectoryAdmin<U> {
    /// Create an admin with the default audit capacity
    pub fn new(owner: U, directory: Arc<RoleDirectory<U>>) -> Self {
        Self::with_audit_capacity(owner, directory, DEFAULT_AUDIT_CAPACITY)
    }

    /// Create an admin with a bounded audit trail of `capacity` entries
    pub fn with_audit_capacity(owner: U, directory: Arc<RoleDirectory<U>>, capacity: usize) -> Self {
        Self::with_audit_log(owner, directory, AuditLogger::new(capacity))
    }

    /// Create an admin continuing an existing audit trail
    pub fn with_audit_log(owner: U, directory: Arc<RoleDirectory<U>>, audit: AuditLogger) -> Self {
        Self {
            ownership: Ownable::new(owner),
            directory,
            audit: Mutex::new(audit),
        }
    }

    fn audit(&self) -> MutexGuard<'_, AuditLogger> {
        self.audit.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `operation` as the owner, auditing a rejected caller
    fn as_owner<T, F>(&self, caller: &U, action: &str, operation: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let mut authorized = false;
        let result = self.ownership.with_owner(caller, || {
            authorized = true;
            operation()
        });
        if !authorized {
            self.audit().log_admin_rejected(&caller.to_string(), action);
        }
        result
    }

    /// The current owner
    pub fn owner(&self) -> U {
        self.ownership.current_owner()
    }

    /// The managed directory
    pub fn directory(&self) -> &Arc<RoleDirectory<U>> {
        &self.directory
    }

    /// A gate over the managed directory
    pub fn gate(&self) -> Secured<U> {
        Secured::new(Arc::clone(&self.directory))
    }

    /// Register a system role (owner only)
    pub fn register_role(&self, caller: &U, role: &str) -> Result<()> {
        self.as_owner(caller, "register_role", || {
            let result = self.directory.add_system_role(role);
            self.audit().log_role_registered(
                &caller.to_string(),
                role,
                result.is_ok(),
                result.as_ref().err().map(|e| e.to_string()).as_deref(),
            );
            result
        })
    }

    /// Grant a role to a user (owner only). Returns `true` if newly granted.
    pub fn grant(&self, caller: &U, user: U, role: &str) -> Result<bool> {
        self.as_owner(caller, "grant", || {
            let subject = user.to_string();
            let result = self.directory.add_role_to_user(user, role);
            let reason = match &result {
                Ok(false) => Some("already held".to_string()),
                Ok(true) => None,
                Err(e) => Some(e.to_string()),
            };
            self.audit().log_membership_change(
                &caller.to_string(),
                &subject,
                role,
                true,
                result.is_ok(),
                reason.as_deref(),
            );
            result
        })
    }

    /// Revoke a role from a user (owner only). Returns `true` if it was held.
    pub fn revoke(&self, caller: &U, user: &U, role: &str) -> Result<bool> {
        self.as_owner(caller, "revoke", || {
            let removed = self.directory.remove_role_from_user(user, role);
            self.audit().log_membership_change(
                &caller.to_string(),
                &user.to_string(),
                role,
                false,
                true,
                (!removed).then_some("not held"),
            );
            Ok(removed)
        })
    }

    /// Transfer administrative ownership
    pub fn transfer_ownership(&self, caller: &U, new_owner: U) -> Result<()> {
        let target = new_owner.to_string();
        let result = self.ownership.transfer_ownership(caller, new_owner);
        self.audit().log_ownership_transfer(
            &caller.to_string(),
            &target,
            result.is_ok(),
            result.as_ref().err().map(RbacError::kind),
        );
        result
    }

    /// Gate check whose decision is recorded in the audit trail
    pub fn check(&self, acting: &U, role: &str) -> Result<()> {
        let result = self.gate().require_role(acting, role);
        self.audit()
            .log_access(&acting.to_string(), role, result.is_ok());
        result
    }

    /// Audit statistics
    pub fn audit_stats(&self) -> AuditStats {
        self.audit().get_stats()
    }

    /// Most recent audit entries, newest first
    pub fn recent_audit(&self, limit: usize) -> Vec<AuditEntry> {
        self.audit().get_recent(limit).into_iter().cloned().collect()
    }

    /// Most recent failed entries, newest first
    pub fn recent_denials(&self, limit: usize) -> Vec<AuditEntry> {
        self.audit()
            .get_recent_denials(limit)
            .into_iter()
            .cloned()
            .collect()
    }

    /// All retained audit entries, oldest first
    pub fn audit_entries(&self) -> Vec<AuditEntry> {
        self.audit().entries()
    }

    /// Full audit trail as JSON
    pub fn export_audit(&self) -> serde_json::Value {
        self.audit().export_json()
    }
}
