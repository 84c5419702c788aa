//! # Role Directory RBAC
//!
//! Role-Based Access Control registry and gates.
//!
//! ## Components
//!
//! - `RoleDirectory` - Known roles and user role memberships
//! - `Secured` - Authorization gate over a shared directory
//! - `Ownable` - Single administrative identity
//! - `DirectoryAdmin` - Owner-restricted, audited administration
//! - `StoreFile` - JSON export/import of an administered directory

pub mod admin;
pub mod directory;
pub mod ownable;
pub mod secured;
pub mod store;

pub use admin::DirectoryAdmin;
pub use directory::{DirectorySnapshot, RoleDirectory};
pub use ownable::Ownable;
pub use secured::Secured;
pub use store::StoreFile;
