//! Configuration types for the role directory

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::RbacError;

/// Default bound on retained audit entries
pub const DEFAULT_AUDIT_CAPACITY: usize = 10000;

/// Directory configuration (roledir.json / roledir.yaml)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryConfig {
    /// Store file holding the owner and directory snapshot
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Maximum number of retained audit entries
    #[serde(default = "default_audit_capacity")]
    pub audit_capacity: usize,

    /// Roles registered when a new store is initialized
    #[serde(default)]
    pub seed_roles: Vec<String>,

    /// Initial owner for a new store
    #[serde(default)]
    pub owner: Option<String>,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("roledir.json")
}

fn default_audit_capacity() -> usize {
    DEFAULT_AUDIT_CAPACITY
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            audit_capacity: default_audit_capacity(),
            seed_roles: Vec::new(),
            owner: None,
        }
    }
}

impl DirectoryConfig {
    /// Load configuration from a JSON or YAML file (chosen by extension)
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the directory cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        if self.audit_capacity == 0 {
            return Err(RbacError::Config(
                "auditCapacity must be greater than zero".to_string(),
            ));
        }
        if let Some(role) = self.seed_roles.iter().find(|r| r.trim().is_empty()) {
            return Err(RbacError::Config(format!(
                "seedRoles contains an empty role name: {:?}",
                role
            )));
        }
        Ok(())
    }
}
