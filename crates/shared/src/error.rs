//! Error types for the role directory

use thiserror::Error;

/// Error thrown when a role is registered twice
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Role '{role}' is already registered")]
pub struct DuplicateRoleError {
    pub role: String,
}

/// Error thrown when a role is referenced before registration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Role '{role}' is not registered")]
pub struct UnknownRoleError {
    pub role: String,
}

/// Error thrown when the acting user lacks the required role
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Access denied: user '{user}' does not hold role '{role}'")]
pub struct AccessDeniedError {
    pub user: String,
    pub role: String,
}

/// Error thrown when a caller other than the owner attempts an owner-only action
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Caller '{caller}' is not the owner (owner is '{owner}')")]
pub struct UnauthorizedError {
    pub caller: String,
    pub owner: String,
}

/// Error thrown for malformed or empty identifiers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {argument}: {reason}")]
pub struct InvalidArgumentError {
    pub argument: String,
    pub reason: String,
}

impl InvalidArgumentError {
    pub fn new(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            argument: argument.into(),
            reason: reason.into(),
        }
    }
}

/// General error type for directory, gate and ownership operations
#[derive(Debug, Error)]
pub enum RbacError {
    #[error(transparent)]
    DuplicateRole(#[from] DuplicateRoleError),

    #[error(transparent)]
    UnknownRole(#[from] UnknownRoleError),

    #[error(transparent)]
    AccessDenied(#[from] AccessDeniedError),

    #[error(transparent)]
    Unauthorized(#[from] UnauthorizedError),

    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgumentError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl RbacError {
    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            RbacError::DuplicateRole(_) => "duplicate_role",
            RbacError::UnknownRole(_) => "unknown_role",
            RbacError::AccessDenied(_) => "access_denied",
            RbacError::Unauthorized(_) => "unauthorized",
            RbacError::InvalidArgument(_) => "invalid_argument",
            RbacError::Config(_) => "config",
            RbacError::Io(_) => "io",
            RbacError::Json(_) => "json",
            RbacError::Yaml(_) => "yaml",
        }
    }
}

pub type Result<T> = std::result::Result<T, RbacError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_values() {
        let err: RbacError = AccessDeniedError {
            user: "1".to_string(),
            role: "auditor".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Access denied: user '1' does not hold role 'auditor'"
        );

        let err: RbacError = UnauthorizedError {
            caller: "mallory".to_string(),
            owner: "alice".to_string(),
        }
        .into();
        assert!(err.to_string().contains("mallory"));
        assert!(err.to_string().contains("alice"));
    }

    #[test]
    fn test_kind_distinguishes_variants() {
        let dup: RbacError = DuplicateRoleError { role: "r".into() }.into();
        let unknown: RbacError = UnknownRoleError { role: "r".into() }.into();
        let invalid: RbacError = InvalidArgumentError::new("role", "must not be empty").into();

        assert_eq!(dup.kind(), "duplicate_role");
        assert_eq!(unknown.kind(), "unknown_role");
        assert_eq!(invalid.kind(), "invalid_argument");
        assert_eq!(invalid.to_string(), "Invalid role: must not be empty");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: RbacError = io.into();
        assert!(matches!(err, RbacError::Io(_)));
    }
}
