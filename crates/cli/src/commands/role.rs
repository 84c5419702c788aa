//! roledir role command

use clap::{Args, Subcommand};

use crate::context::CliContext;

#[derive(Debug, Args)]
pub struct RoleCommand {
    #[command(subcommand)]
    pub command: RoleSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum RoleSubcommand {
    /// Register a new system role (owner only)
    Add {
        /// Role name
        role: String,
    },
    /// List all registered roles
    List,
    /// Check whether a role is registered
    Exists {
        /// Role name
        role: String,
    },
}

impl RoleCommand {
    pub fn run(&self, ctx: &CliContext) -> anyhow::Result<()> {
        let admin = ctx.open()?;

        match &self.command {
            RoleSubcommand::Add { role } => {
                let result = admin.register_role(ctx.acting()?, role);
                ctx.commit(&admin, result)?;
                ctx.emit(
                    serde_json::json!({ "role": role, "registered": true }),
                    format!("✓ Registered role '{}'", role),
                );
            }
            RoleSubcommand::List => {
                let roles = admin.directory().roles();
                let human = if roles.is_empty() {
                    "No roles registered".to_string()
                } else {
                    roles
                        .iter()
                        .map(|r| format!("  - {}", r))
                        .collect::<Vec<_>>()
                        .join("\n")
                };
                ctx.emit(serde_json::json!({ "roles": roles }), human);
            }
            RoleSubcommand::Exists { role } => {
                let exists = admin.directory().role_exists(role);
                ctx.emit(
                    serde_json::json!({ "role": role, "exists": exists }),
                    exists,
                );
            }
        }
        Ok(())
    }
}
