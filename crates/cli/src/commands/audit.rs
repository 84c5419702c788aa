//! roledir audit command

use clap::Args;

use crate::context::CliContext;

#[derive(Debug, Args)]
pub struct AuditCommand {
    /// Only show failed operations and denied checks
    #[arg(long)]
    pub denials: bool,

    /// Maximum number of entries, newest first
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}

impl AuditCommand {
    pub fn run(&self, ctx: &CliContext) -> anyhow::Result<()> {
        let admin = ctx.open()?;
        let entries = if self.denials {
            admin.recent_denials(self.limit)
        } else {
            admin.recent_audit(self.limit)
        };

        let human = if entries.is_empty() {
            "No audit entries".to_string()
        } else {
            entries
                .iter()
                .map(|e| {
                    let mut line = format!(
                        "{} {} {:?} by '{}'",
                        e.timestamp,
                        if e.success { "✓" } else { "✗" },
                        e.event_type,
                        e.actor
                    );
                    if let Some(subject) = &e.subject {
                        line.push_str(&format!(" on '{}'", subject));
                    }
                    if let Some(role) = &e.role {
                        line.push_str(&format!(" role '{}'", role));
                    }
                    if let Some(reason) = &e.reason {
                        line.push_str(&format!(" ({})", reason));
                    }
                    line
                })
                .collect::<Vec<_>>()
                .join("\n")
        };
        ctx.emit(serde_json::to_value(&entries)?, human);
        Ok(())
    }
}
