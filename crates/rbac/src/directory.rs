//! RoleDirectory - Registry of system roles and user memberships

use serde::{Deserialize, Serialize};
use shared::{
    DuplicateRoleError, Identity, InvalidArgumentError, Result, UnknownRoleError, UserId,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// Point-in-time copy of a directory's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(
    serialize = "U: Serialize",
    deserialize = "U: Deserialize<'de> + Ord"
))]
pub struct DirectorySnapshot<U> {
    #[serde(default)]
    pub known_roles: BTreeSet<String>,
    #[serde(default)]
    pub user_roles: BTreeMap<U, BTreeSet<String>>,
}

impl<U> Default for DirectorySnapshot<U> {
    fn default() -> Self {
        Self {
            known_roles: BTreeSet::new(),
            user_roles: BTreeMap::new(),
        }
    }
}

#[derive(Debug)]
struct DirectoryState<U> {
    known_roles: BTreeSet<String>,
    user_roles: BTreeMap<U, BTreeSet<String>>,
}

/// Authoritative store of known roles and user role memberships.
///
/// All state lives behind one `RwLock`: mutations take the write lock and are
/// observed atomically by concurrent queries. Every mutation validates before
/// writing, so a poisoned lock still guards consistent data and is recovered.
#[derive(Debug)]
pub struct RoleDirectory<U = UserId> {
    state: RwLock<DirectoryState<U>>,
}

fn validate_role_name(role: &str) -> Result<()> {
    if role.trim().is_empty() {
        return Err(InvalidArgumentError::new("role", "role name must not be empty").into());
    }
    Ok(())
}

impl<U: Identity> RoleDirectory<U> {
    /// Create an empty directory
    pub fn new() -> Self {
        Self {
            state: RwLock::new(DirectoryState {
                known_roles: BTreeSet::new(),
                user_roles: BTreeMap::new(),
            }),
        }
    }

    /// Build a directory from a snapshot, validating referential integrity
    pub fn from_snapshot(snapshot: DirectorySnapshot<U>) -> Result<Self> {
        let directory = Self::new();
        directory.restore(snapshot)?;
        Ok(directory)
    }

    fn read(&self) -> RwLockReadGuard<'_, DirectoryState<U>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DirectoryState<U>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a system role
    pub fn add_system_role(&self, role: &str) -> Result<()> {
        validate_role_name(role)?;

        let mut state = self.write();
        if !state.known_roles.insert(role.to_string()) {
            return Err(DuplicateRoleError {
                role: role.to_string(),
            }
            .into());
        }

        info!(role, "registered system role");
        Ok(())
    }

    /// Check if a role has been registered
    pub fn role_exists(&self, role: &str) -> bool {
        self.read().known_roles.contains(role)
    }

    /// Grant a registered role to a user.
    ///
    /// Re-granting a role the user already holds is accepted and changes
    /// nothing. Returns `true` when the membership was newly added.
    pub fn add_role_to_user(&self, user: U, role: &str) -> Result<bool> {
        if user.is_null() {
            return Err(InvalidArgumentError::new("user", "identity must not be null").into());
        }

        let mut state = self.write();
        if !state.known_roles.contains(role) {
            return Err(UnknownRoleError {
                role: role.to_string(),
            }
            .into());
        }

        let added = state
            .user_roles
            .entry(user.clone())
            .or_default()
            .insert(role.to_string());

        if added {
            info!(user = %user, role, "granted role to user");
        } else {
            debug!(user = %user, role, "user already holds role");
        }
        Ok(added)
    }

    /// Check if a user holds a role. Users never seen hold no roles.
    pub fn user_in_role(&self, user: &U, role: &str) -> bool {
        self.read()
            .user_roles
            .get(user)
            .is_some_and(|roles| roles.contains(role))
    }

    /// Revoke a role from a user, leaving the user's other roles untouched.
    ///
    /// Revoking a role the user does not hold is a no-op. Returns `true` when
    /// a membership was removed.
    pub fn remove_role_from_user(&self, user: &U, role: &str) -> bool {
        let mut state = self.write();
        let Some(roles) = state.user_roles.get_mut(user) else {
            debug!(user = %user, role, "user holds no roles");
            return false;
        };

        let removed = roles.remove(role);
        if roles.is_empty() {
            state.user_roles.remove(user);
        }

        if removed {
            info!(user = %user, role, "revoked role from user");
        } else {
            debug!(user = %user, role, "user does not hold role");
        }
        removed
    }

    /// All registered roles, sorted
    pub fn roles(&self) -> Vec<String> {
        self.read().known_roles.iter().cloned().collect()
    }

    /// Roles held by a user, sorted
    pub fn roles_of(&self, user: &U) -> Vec<String> {
        self.read()
            .user_roles
            .get(user)
            .map(|roles| roles.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Users holding a role, sorted
    pub fn users_in_role(&self, role: &str) -> Vec<U> {
        self.read()
            .user_roles
            .iter()
            .filter(|(_, roles)| roles.contains(role))
            .map(|(user, _)| user.clone())
            .collect()
    }

    /// Number of registered roles
    pub fn role_count(&self) -> usize {
        self.read().known_roles.len()
    }

    /// Number of users holding at least one role
    pub fn user_count(&self) -> usize {
        self.read().user_roles.len()
    }

    /// Take a consistent snapshot of the directory
    pub fn snapshot(&self) -> DirectorySnapshot<U> {
        let state = self.read();
        DirectorySnapshot {
            known_roles: state.known_roles.clone(),
            user_roles: state.user_roles.clone(),
        }
    }

    /// Replace the directory's state with a snapshot.
    ///
    /// The snapshot is fully validated first; on error the current state is
    /// left untouched.
    pub fn restore(&self, snapshot: DirectorySnapshot<U>) -> Result<()> {
        for role in &snapshot.known_roles {
            validate_role_name(role)?;
        }

        let mut user_roles = snapshot.user_roles;
        for (user, roles) in &user_roles {
            if user.is_null() {
                return Err(InvalidArgumentError::new("user", "snapshot contains a null user").into());
            }
            if let Some(role) = roles.iter().find(|r| !snapshot.known_roles.contains(*r)) {
                return Err(UnknownRoleError { role: role.clone() }.into());
            }
        }
        user_roles.retain(|_, roles| !roles.is_empty());

        let mut state = self.write();
        state.known_roles = snapshot.known_roles;
        state.user_roles = user_roles;

        info!(
            roles = state.known_roles.len(),
            users = state.user_roles.len(),
            "restored directory from snapshot"
        );
        Ok(())
    }
}

impl<U: Identity> Default for RoleDirectory<U> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::RbacError;
    use std::sync::Arc;

    /// Directory with `role_1` registered, mirroring the usual fixture
    fn directory() -> RoleDirectory<u64> {
        let directory = RoleDirectory::new();
        directory.add_system_role("role_1").unwrap();
        directory
    }

    // ============== Role Registration ==============

    #[test]
    fn test_store_new_role() {
        let directory = directory();
        assert!(directory.role_exists("role_1"));
    }

    #[test]
    fn test_reject_double_role() {
        let directory = directory();

        let err = directory.add_system_role("role_1").unwrap_err();
        assert!(matches!(err, RbacError::DuplicateRole(ref e) if e.role == "role_1"));
        assert_eq!(directory.roles(), vec!["role_1"]);
    }

    #[test]
    fn test_role_not_added_does_not_exist() {
        let directory = directory();
        assert!(!directory.role_exists("role_2"));
    }

    #[test]
    fn test_contains_multiple_roles() {
        let directory = directory();
        directory.add_system_role("role_2").unwrap();
        directory.add_system_role("role_3").unwrap();

        assert!(directory.role_exists("role_1"));
        assert!(directory.role_exists("role_2"));
        assert!(directory.role_exists("role_3"));
        assert_eq!(directory.role_count(), 3);
    }

    #[test]
    fn test_empty_role_name_rejected() {
        let directory = RoleDirectory::<u64>::new();

        assert!(matches!(
            directory.add_system_role(""),
            Err(RbacError::InvalidArgument(_))
        ));
        assert!(matches!(
            directory.add_system_role("  "),
            Err(RbacError::InvalidArgument(_))
        ));
        assert_eq!(directory.role_count(), 0);
    }

    #[test]
    fn test_role_names_are_exact() {
        let directory = directory();
        assert!(!directory.role_exists("Role_1"));
        assert!(!directory.role_exists(" role_1"));
    }

    #[test]
    fn test_registering_role_assigns_nobody() {
        let directory = directory();
        assert!(directory.users_in_role("role_1").is_empty());
        assert_eq!(directory.user_count(), 0);
    }

    // ============== User Membership ==============

    #[test]
    fn test_assign_role_to_user() {
        let directory = directory();
        directory.add_role_to_user(1, "role_1").unwrap();
        assert!(directory.user_in_role(&1, "role_1"));
    }

    #[test]
    fn test_assign_unknown_role_fails() {
        let directory = directory();

        let err = directory.add_role_to_user(1, "role_2").unwrap_err();
        assert!(matches!(err, RbacError::UnknownRole(ref e) if e.role == "role_2"));
        assert!(!directory.user_in_role(&1, "role_2"));
        assert_eq!(directory.user_count(), 0);
    }

    #[test]
    fn test_assign_to_null_user_rejected() {
        let directory = directory();

        let err = directory.add_role_to_user(0, "role_1").unwrap_err();
        assert!(matches!(err, RbacError::InvalidArgument(ref e) if e.argument == "user"));
        assert_eq!(directory.user_count(), 0);

        let named = RoleDirectory::<UserId>::new();
        named.add_system_role("role_1").unwrap();
        assert!(matches!(
            named.add_role_to_user(UserId::from(" "), "role_1"),
            Err(RbacError::InvalidArgument(_))
        ));

        // Every accepted write must survive a snapshot round trip
        assert!(RoleDirectory::from_snapshot(named.snapshot()).is_ok());
    }

    #[test]
    fn test_no_extra_role_assigned() {
        let directory = directory();
        directory.add_system_role("role_2").unwrap();
        directory.add_role_to_user(1, "role_1").unwrap();

        assert!(directory.user_in_role(&1, "role_1"));
        assert!(!directory.user_in_role(&1, "role_2"));
    }

    #[test]
    fn test_user_holds_multiple_roles() {
        let directory = directory();
        directory.add_system_role("role_2").unwrap();
        directory.add_role_to_user(1, "role_1").unwrap();
        directory.add_role_to_user(1, "role_2").unwrap();

        assert!(directory.user_in_role(&1, "role_1"));
        assert!(directory.user_in_role(&1, "role_2"));
        assert_eq!(directory.roles_of(&1), vec!["role_1", "role_2"]);
    }

    #[test]
    fn test_regrant_is_noop() {
        let directory = directory();

        assert!(directory.add_role_to_user(1, "role_1").unwrap());
        assert!(!directory.add_role_to_user(1, "role_1").unwrap());
        assert_eq!(directory.roles_of(&1), vec!["role_1"]);
    }

    #[test]
    fn test_unknown_user_holds_nothing() {
        let directory = directory();
        assert!(!directory.user_in_role(&99, "role_1"));
        assert!(directory.roles_of(&99).is_empty());
    }

    #[test]
    fn test_memberships_are_per_user() {
        let directory = directory();
        directory.add_role_to_user(1, "role_1").unwrap();
        assert!(!directory.user_in_role(&2, "role_1"));
        assert_eq!(directory.users_in_role("role_1"), vec![1]);
    }

    // ============== Revocation ==============

    #[test]
    fn test_remove_role_from_user() {
        let directory = directory();
        directory.add_system_role("role_2").unwrap();
        directory.add_role_to_user(1, "role_1").unwrap();
        directory.add_role_to_user(1, "role_2").unwrap();

        assert!(directory.user_in_role(&1, "role_1"));
        assert!(directory.user_in_role(&1, "role_2"));

        // Removing role_2 keeps role_1
        assert!(directory.remove_role_from_user(&1, "role_2"));
        assert!(!directory.user_in_role(&1, "role_2"));
        assert!(directory.user_in_role(&1, "role_1"));

        assert!(directory.remove_role_from_user(&1, "role_1"));
        assert!(!directory.user_in_role(&1, "role_1"));
        assert_eq!(directory.user_count(), 0);
    }

    #[test]
    fn test_remove_unheld_role_is_noop() {
        let directory = directory();
        directory.add_role_to_user(1, "role_1").unwrap();

        assert!(!directory.remove_role_from_user(&1, "missing"));
        assert!(!directory.remove_role_from_user(&2, "role_1"));
        assert!(directory.user_in_role(&1, "role_1"));
    }

    #[test]
    fn test_removal_keeps_role_registered() {
        let directory = directory();
        directory.add_role_to_user(1, "role_1").unwrap();
        directory.remove_role_from_user(&1, "role_1");

        assert!(directory.role_exists("role_1"));
        assert!(directory.add_role_to_user(1, "role_1").unwrap());
    }

    // ============== Snapshots ==============

    #[test]
    fn test_snapshot_restore_preserves_answers() {
        let directory = directory();
        directory.add_system_role("role_2").unwrap();
        directory.add_role_to_user(1, "role_1").unwrap();
        directory.add_role_to_user(2, "role_2").unwrap();

        let restored = RoleDirectory::from_snapshot(directory.snapshot()).unwrap();

        assert!(restored.role_exists("role_1"));
        assert!(restored.role_exists("role_2"));
        assert!(restored.user_in_role(&1, "role_1"));
        assert!(!restored.user_in_role(&1, "role_2"));
        assert!(restored.user_in_role(&2, "role_2"));
    }

    #[test]
    fn test_restore_rejects_unregistered_role() {
        let directory = directory();
        directory.add_role_to_user(1, "role_1").unwrap();

        let mut snapshot = DirectorySnapshot::default();
        snapshot.known_roles.insert("role_a".to_string());
        snapshot
            .user_roles
            .insert(7, BTreeSet::from(["role_b".to_string()]));

        let err = directory.restore(snapshot).unwrap_err();
        assert!(matches!(err, RbacError::UnknownRole(ref e) if e.role == "role_b"));

        // Previous state intact
        assert!(directory.role_exists("role_1"));
        assert!(!directory.role_exists("role_a"));
        assert!(directory.user_in_role(&1, "role_1"));
    }

    #[test]
    fn test_restore_rejects_null_user() {
        let mut snapshot = DirectorySnapshot::<u64>::default();
        snapshot.known_roles.insert("role_1".to_string());
        snapshot
            .user_roles
            .insert(0, BTreeSet::from(["role_1".to_string()]));

        assert!(matches!(
            RoleDirectory::from_snapshot(snapshot),
            Err(RbacError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_restore_drops_empty_role_sets() {
        let mut snapshot = DirectorySnapshot::<u64>::default();
        snapshot.known_roles.insert("role_1".to_string());
        snapshot.user_roles.insert(5, BTreeSet::new());

        let directory = RoleDirectory::from_snapshot(snapshot).unwrap();
        assert_eq!(directory.user_count(), 0);
    }

    #[test]
    fn test_snapshot_json_layout() {
        let directory = RoleDirectory::<UserId>::new();
        directory.add_system_role("role_1").unwrap();
        directory
            .add_role_to_user(UserId::from("alice"), "role_1")
            .unwrap();

        let json = serde_json::to_value(directory.snapshot()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "knownRoles": ["role_1"],
                "userRoles": { "alice": ["role_1"] }
            })
        );
    }

    // ============== Concurrency ==============

    #[test]
    fn test_concurrent_grants_for_same_user_are_not_lost() {
        let directory = Arc::new(RoleDirectory::<u64>::new());
        let roles: Vec<String> = (0..16).map(|i| format!("role_{}", i)).collect();
        for role in &roles {
            directory.add_system_role(role).unwrap();
        }

        std::thread::scope(|scope| {
            for role in &roles {
                let directory = Arc::clone(&directory);
                scope.spawn(move || {
                    directory.add_role_to_user(1, role).unwrap();
                });
            }
        });

        for role in &roles {
            assert!(directory.user_in_role(&1, role));
        }
        assert_eq!(directory.roles_of(&1).len(), roles.len());
    }

    #[test]
    fn test_concurrent_duplicate_registration_succeeds_once() {
        let owned = RoleDirectory::<u64>::new();
        let directory = &owned;

        let successes: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(move || directory.add_system_role("shared").is_ok()))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap() as usize)
                .sum()
        });

        assert_eq!(successes, 1);
        assert_eq!(directory.roles(), vec!["shared"]);
    }

    #[test]
    fn test_default_trait() {
        let directory: RoleDirectory = RoleDirectory::default();
        assert_eq!(directory.role_count(), 0);
    }
}
