//! roledir init command

use anyhow::bail;
use clap::Args;
use rbac::StoreFile;
use shared::UserId;
use tracing::info;

use crate::context::CliContext;

#[derive(Debug, Args)]
pub struct InitCommand {
    /// Initial owner (defaults to the config owner, then --as)
    #[arg(long)]
    pub owner: Option<String>,

    /// Overwrite an existing store
    #[arg(long)]
    pub force: bool,
}

impl InitCommand {
    pub fn run(&self, ctx: &CliContext) -> anyhow::Result<()> {
        let path = ctx.store_path();
        if path.exists() && !self.force {
            bail!("store {} already exists (use --force to overwrite)", path.display());
        }

        let owner = match (&self.owner, &ctx.config.owner, &ctx.acting) {
            (Some(owner), _, _) | (None, Some(owner), _) => UserId::from(owner.as_str()),
            (None, None, Some(acting)) => acting.clone(),
            (None, None, None) => bail!("no owner given: pass --owner or --as"),
        };

        let admin = StoreFile::new(owner.clone())?.into_admin(ctx.config.audit_capacity)?;
        for role in &ctx.config.seed_roles {
            admin.register_role(&owner, role)?;
        }
        ctx.persist(&admin)?;

        info!(path = %path.display(), owner = %owner, "initialized store");
        ctx.emit(
            serde_json::json!({
                "store": path.display().to_string(),
                "owner": owner,
                "roles": admin.directory().roles(),
            }),
            format!("✓ Initialized {} (owner: {})", path.display(), owner),
        );
        Ok(())
    }
}
