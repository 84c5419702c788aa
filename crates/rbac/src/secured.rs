//! Secured - Role gate in front of privileged operations

use crate::directory::RoleDirectory;
use shared::{AccessDeniedError, Identity, Result, UserId};
use std::sync::Arc;
use tracing::{debug, warn};

/// Authorization gate over a shared [`RoleDirectory`].
///
/// The gate keeps no state of its own: every check reads the directory's
/// current memberships, so a revocation applies to the very next call.
#[derive(Debug)]
pub struct Secured<U = UserId> {
    directory: Arc<RoleDirectory<U>>,
}

impl<U> Clone for Secured<U> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
        }
    }
}

impl<U: Identity> Secured<U> {
    /// Create a gate over `directory`
    pub fn new(directory: Arc<RoleDirectory<U>>) -> Self {
        Self { directory }
    }

    /// The directory this gate consults
    pub fn directory(&self) -> &Arc<RoleDirectory<U>> {
        &self.directory
    }

    /// Check without failing
    pub fn has_role(&self, acting: &U, role: &str) -> bool {
        self.directory.user_in_role(acting, role)
    }

    /// Fail with `AccessDenied` unless `acting` holds `role`.
    ///
    /// Call this before any effect of the privileged operation.
    pub fn require_role(&self, acting: &U, role: &str) -> Result<()> {
        if self.directory.user_in_role(acting, role) {
            debug!(user = %acting, role, "access granted");
            return Ok(());
        }

        warn!(user = %acting, role, "access denied");
        Err(AccessDeniedError {
            user: acting.to_string(),
            role: role.to_string(),
        }
        .into())
    }

    /// Run `operation` only if `acting` holds `role`
    pub fn guarded<T, F>(&self, acting: &U, role: &str, operation: F) -> Result<T>
    where
        F: FnOnce() -> T,
    {
        self.require_role(acting, role)?;
        Ok(operation())
    }
}
