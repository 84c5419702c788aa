//! Shared state for a single CLI invocation

use anyhow::{bail, Context as _};
use rbac::{DirectoryAdmin, StoreFile};
use shared::{DirectoryConfig, UserId};
use std::path::{Path, PathBuf};

/// Resolved configuration, store location and acting identity
#[derive(Debug, Clone)]
pub struct CliContext {
    pub config: DirectoryConfig,
    pub acting: Option<UserId>,
    pub json: bool,
}

impl CliContext {
    /// Resolve the context from global flags
    pub fn new(
        config_path: Option<&Path>,
        store: Option<PathBuf>,
        acting: Option<String>,
        json: bool,
    ) -> anyhow::Result<Self> {
        let mut config = match config_path {
            Some(path) => DirectoryConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => DirectoryConfig::default(),
        };
        if let Some(store) = store {
            config.store_path = store;
        }

        Ok(Self {
            config,
            acting: acting.map(UserId::from),
            json,
        })
    }

    pub fn store_path(&self) -> &Path {
        &self.config.store_path
    }

    /// The identity performing owner-only commands
    pub fn acting(&self) -> anyhow::Result<&UserId> {
        match &self.acting {
            Some(id) => Ok(id),
            None => bail!("no acting identity: pass --as <identity> or set ROLEDIR_AS"),
        }
    }

    /// Load the store file into an administered directory
    pub fn open(&self) -> anyhow::Result<DirectoryAdmin> {
        let path = self.store_path();
        if !path.exists() {
            bail!(
                "store {} does not exist; run `roledir init` first",
                path.display()
            );
        }
        let store = StoreFile::load(path)
            .with_context(|| format!("failed to read store {}", path.display()))?;
        let admin = store
            .into_admin(self.config.audit_capacity)
            .with_context(|| format!("store {} is inconsistent", path.display()))?;
        Ok(admin)
    }

    /// Write the directory back to the store file
    pub fn persist(&self, admin: &DirectoryAdmin) -> anyhow::Result<()> {
        StoreFile::capture(admin)
            .save(self.store_path())
            .with_context(|| format!("failed to write store {}", self.store_path().display()))
    }

    /// Persist `admin` whether or not `result` succeeded, then surface `result`.
    ///
    /// A rejected operation leaves the directory untouched but adds an audit
    /// entry, which must reach the store as well.
    pub fn commit<T>(&self, admin: &DirectoryAdmin, result: shared::Result<T>) -> anyhow::Result<T> {
        self.persist(admin)?;
        Ok(result?)
    }

    /// Print either the JSON value or the human-readable line
    pub fn emit(&self, json: serde_json::Value, human: impl std::fmt::Display) {
        if self.json {
            println!("{}", json);
        } else {
            println!("{}", human);
        }
    }
}
