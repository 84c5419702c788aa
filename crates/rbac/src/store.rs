//! Store file - JSON export/import of an administered directory

use crate::admin::DirectoryAdmin;
use crate::directory::{DirectorySnapshot, RoleDirectory};
use audit::{AuditEntry, AuditLogger};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::{Identity, InvalidArgumentError, Result, UserId};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Owner, directory snapshot and audit trail, as written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(
    serialize = "U: Serialize",
    deserialize = "U: Deserialize<'de> + Ord"
))]
pub struct StoreFile<U = UserId> {
    pub owner: U,
    #[serde(default)]
    pub directory: DirectorySnapshot<U>,
    /// Retained audit entries, oldest first
    #[serde(default)]
    pub audit: Vec<AuditEntry>,
}

impl<U> StoreFile<U>
where
    U: Identity + Serialize + DeserializeOwned,
{
    /// Empty store owned by `owner`
    pub fn new(owner: U) -> Result<Self> {
        if owner.is_null() {
            return Err(InvalidArgumentError::new("owner", "identity must not be null").into());
        }
        Ok(Self {
            owner,
            directory: DirectorySnapshot::default(),
            audit: Vec::new(),
        })
    }

    /// Capture the current owner, directory state and audit trail of `admin`
    pub fn capture(admin: &DirectoryAdmin<U>) -> Self {
        Self {
            owner: admin.owner(),
            directory: admin.directory().snapshot(),
            audit: admin.audit_entries(),
        }
    }

    /// Load a store file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let store: Self = serde_json::from_str(&content)?;
        debug!(path = %path.display(), "loaded store file");
        Ok(store)
    }

    /// Write the store file, replacing any previous version.
    ///
    /// The content goes to a uniquely named temporary file next to `path`
    /// that is renamed over it, so readers never see a partial file. Separate
    /// processes saving the same path are not serialized: the last rename wins.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                std::fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(serde_json::to_string_pretty(self)?.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        debug!(path = %path.display(), "saved store file");
        Ok(())
    }

    /// Rebuild the administered directory, validating the snapshot
    pub fn into_admin(self, audit_capacity: usize) -> Result<DirectoryAdmin<U>> {
        if self.owner.is_null() {
            return Err(InvalidArgumentError::new("owner", "identity must not be null").into());
        }
        let directory = RoleDirectory::from_snapshot(self.directory)?;
        Ok(DirectoryAdmin::with_audit_log(
            self.owner,
            Arc::new(directory),
            AuditLogger::with_entries(audit_capacity, self.audit),
        ))
    }
}
