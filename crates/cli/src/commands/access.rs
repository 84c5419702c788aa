//! roledir grant / revoke / check / show commands

use clap::Args;
use shared::{RbacError, UserId};

use crate::context::CliContext;

#[derive(Debug, Args)]
pub struct GrantCommand {
    /// User identity
    pub user: String,
    /// Registered role
    pub role: String,
}

impl GrantCommand {
    pub fn run(&self, ctx: &CliContext) -> anyhow::Result<()> {
        let admin = ctx.open()?;
        let result = admin.grant(ctx.acting()?, UserId::from(self.user.as_str()), &self.role);
        let added = ctx.commit(&admin, result)?;

        let human = if added {
            format!("✓ Granted '{}' to '{}'", self.role, self.user)
        } else {
            format!("'{}' already holds '{}'", self.user, self.role)
        };
        ctx.emit(
            serde_json::json!({ "user": self.user, "role": self.role, "changed": added }),
            human,
        );
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct RevokeCommand {
    /// User identity
    pub user: String,
    /// Role to remove
    pub role: String,
}

impl RevokeCommand {
    pub fn run(&self, ctx: &CliContext) -> anyhow::Result<()> {
        let admin = ctx.open()?;
        let result = admin.revoke(ctx.acting()?, &UserId::from(self.user.as_str()), &self.role);
        let removed = ctx.commit(&admin, result)?;

        let human = if removed {
            format!("✓ Revoked '{}' from '{}'", self.role, self.user)
        } else {
            format!("'{}' does not hold '{}'", self.user, self.role)
        };
        ctx.emit(
            serde_json::json!({ "user": self.user, "role": self.role, "changed": removed }),
            human,
        );
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// User identity
    pub user: String,
    /// Required role
    pub role: String,
}

impl CheckCommand {
    /// Returns whether access is granted
    pub fn run(&self, ctx: &CliContext) -> anyhow::Result<bool> {
        let admin = ctx.open()?;
        let allowed = match admin.check(&UserId::from(self.user.as_str()), &self.role) {
            Ok(()) => true,
            Err(RbacError::AccessDenied(_)) => false,
            Err(e) => return Err(e.into()),
        };
        // Keep the recorded decision
        ctx.persist(&admin)?;

        let human = if allowed {
            format!("✓ '{}' holds '{}'", self.user, self.role)
        } else {
            format!("✗ '{}' does not hold '{}'", self.user, self.role)
        };
        ctx.emit(
            serde_json::json!({ "user": self.user, "role": self.role, "allowed": allowed }),
            human,
        );
        Ok(allowed)
    }
}

#[derive(Debug, Args)]
pub struct ShowCommand {
    /// User identity
    pub user: String,
}

impl ShowCommand {
    pub fn run(&self, ctx: &CliContext) -> anyhow::Result<()> {
        let admin = ctx.open()?;
        let roles = admin.directory().roles_of(&UserId::from(self.user.as_str()));

        let human = if roles.is_empty() {
            format!("'{}' holds no roles", self.user)
        } else {
            format!("'{}' holds: {}", self.user, roles.join(", "))
        };
        ctx.emit(serde_json::json!({ "user": self.user, "roles": roles }), human);
        Ok(())
    }
}
