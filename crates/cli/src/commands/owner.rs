//! roledir owner command

use clap::{Args, Subcommand};
use shared::UserId;

use crate::context::CliContext;

#[derive(Debug, Args)]
pub struct OwnerCommand {
    #[command(subcommand)]
    pub command: OwnerSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum OwnerSubcommand {
    /// Show the current owner
    Show,
    /// Hand ownership to another identity (owner only)
    Transfer {
        /// New owner identity
        new_owner: String,
    },
}

impl OwnerCommand {
    pub fn run(&self, ctx: &CliContext) -> anyhow::Result<()> {
        let admin = ctx.open()?;

        match &self.command {
            OwnerSubcommand::Show => {
                let owner = admin.owner();
                ctx.emit(serde_json::json!({ "owner": owner }), owner);
            }
            OwnerSubcommand::Transfer { new_owner } => {
                let new_owner = UserId::from(new_owner.as_str());
                let result = admin.transfer_ownership(ctx.acting()?, new_owner.clone());
                ctx.commit(&admin, result)?;
                ctx.emit(
                    serde_json::json!({ "owner": new_owner }),
                    format!("✓ Ownership transferred to '{}'", new_owner),
                );
            }
        }
        Ok(())
    }
}
