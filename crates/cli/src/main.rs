//! roledir - Command-line administration of a role directory store
//!
//! Usage:
//!   roledir init [--owner <id>]           - Create a new store
//!   roledir role add|list|exists <role>   - Manage system roles
//!   roledir grant <user> <role>           - Grant a role (owner only)
//!   roledir revoke <user> <role>          - Revoke a role (owner only)
//!   roledir check <user> <role>           - Exit 1 unless the user holds the role
//!   roledir show <user>                   - List a user's roles
//!   roledir owner show|transfer <id>      - Inspect or hand over ownership
//!   roledir audit [--denials] [--limit N] - Show recent audit entries

use clap::{Parser, Subcommand};
use cli::commands::{
    AuditCommand, CheckCommand, GrantCommand, InitCommand, OwnerCommand, RevokeCommand,
    RoleCommand, ShowCommand,
};
use cli::context::CliContext;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "roledir")]
#[command(about = "Role directory - register roles, manage memberships, gate access")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (JSON or YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Store file (overrides the config's storePath)
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,

    /// Acting identity for owner-only commands
    #[arg(long = "as", global = true, env = "ROLEDIR_AS")]
    acting: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new store
    Init(InitCommand),
    /// Manage system roles
    Role(RoleCommand),
    /// Grant a role to a user
    Grant(GrantCommand),
    /// Revoke a role from a user
    Revoke(RevokeCommand),
    /// Check whether a user holds a role
    Check(CheckCommand),
    /// List a user's roles
    Show(ShowCommand),
    /// Inspect or transfer ownership
    Owner(OwnerCommand),
    /// Show recent audit entries
    Audit(AuditCommand),
}

fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = CliContext::new(cli.config.as_deref(), cli.store, cli.acting, cli.json)?;

    match cli.command {
        Commands::Init(cmd) => cmd.run(&ctx)?,
        Commands::Role(cmd) => cmd.run(&ctx)?,
        Commands::Grant(cmd) => cmd.run(&ctx)?,
        Commands::Revoke(cmd) => cmd.run(&ctx)?,
        Commands::Show(cmd) => cmd.run(&ctx)?,
        Commands::Owner(cmd) => cmd.run(&ctx)?,
        Commands::Audit(cmd) => cmd.run(&ctx)?,
        Commands::Check(cmd) => {
            if !cmd.run(&ctx)? {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
