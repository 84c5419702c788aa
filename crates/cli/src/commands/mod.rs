//! CLI Commands

pub mod access;
pub mod audit;
pub mod init;
pub mod owner;
pub mod role;

pub use access::{CheckCommand, GrantCommand, RevokeCommand, ShowCommand};
pub use audit::AuditCommand;
pub use init::InitCommand;
pub use owner::{OwnerCommand, OwnerSubcommand};
pub use role::{RoleCommand, RoleSubcommand};
