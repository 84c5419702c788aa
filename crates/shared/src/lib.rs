//! # Role Directory Shared
//!
//! Common types used across the role directory crates: user identities,
//! the error taxonomy and configuration.

pub mod config;
pub mod error;
pub mod identity;

// Re-exports
pub use config::*;
pub use error::*;
pub use identity::*;
