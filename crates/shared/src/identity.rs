//! User identity types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// An opaque, already-authenticated user identifier.
///
/// The directory only compares and hashes identities.
/// `is_null` marks the one value that can never own anything
/// (the zero account, an empty name).
pub trait Identity:
    Clone + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    fn is_null(&self) -> bool;
}

impl Identity for u64 {
    fn is_null(&self) -> bool {
        *self == 0
    }
}

impl Identity for String {
    fn is_null(&self) -> bool {
        self.trim().is_empty()
    }
}

/// String-backed user identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Identity for UserId {
    fn is_null(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl std::str::FromStr for UserId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_identities() {
        assert!(0u64.is_null());
        assert!(!1u64.is_null());
        assert!(String::new().is_null());
        assert!("   ".to_string().is_null());
        assert!(UserId::default().is_null());
        assert!(!UserId::from("alice").is_null());
    }

    #[test]
    fn test_user_id_conversions() {
        assert_eq!(UserId::from(42u64).as_str(), "42");
        assert_eq!(UserId::from("bob").to_string(), "bob");
        let parsed: UserId = "carol".parse().unwrap();
        assert_eq!(parsed, UserId::new("carol"));
    }

    #[test]
    fn test_user_id_serializes_transparently() {
        let json = serde_json::to_string(&UserId::from("alice")).unwrap();
        assert_eq!(json, "\"alice\"");
    }
}
