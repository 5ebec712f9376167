//! Human-readable terminal renderer.

use std::path::Path;

use owo_colors::OwoColorize as _;

use crate::application::services::key_check::KeyReport;
use crate::domain::agent::{AgentRecord, mask_key, validate_api_key};
use crate::domain::backup::BackupName;
use crate::domain::config::EditorConfig;
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        println!("agent-editor {version}");
    }

    /// Render the agent list with 1-based positions. Records whose key would
    /// be rejected are flagged.
    pub fn render_agent_list(&self, agents: &[AgentRecord], selection: Option<usize>) {
        if agents.is_empty() {
            if !self.ctx.quiet {
                println!("No agents yet. Create one: agent-editor agents new --name <name>");
            }
            return;
        }

        let styles = &self.ctx.styles;
        println!(
            "  {}",
            format!("{:>3}  {:<12} {:<28} {}", "#", "ID", "NAME", "MODEL").style(styles.dim)
        );
        for (i, agent) in agents.iter().enumerate() {
            let marker = if selection == Some(i) { "*" } else { " " };
            let line = format!(
                "{:>3}{} {:<12} {:<28} {}",
                i + 1,
                marker.style(styles.selected),
                truncate(&agent.id, 12),
                truncate(&agent.name, 28),
                agent.model
            );
            let verdict = validate_api_key(&agent.api_key_variable_name);
            if verdict.is_accepted() {
                println!("  {line}");
            } else {
                println!(
                    "  {line}  {}",
                    format!("[key {}]", verdict.reason()).style(styles.warning)
                );
            }
        }
    }

    /// Render every field of one record; the key is masked.
    pub fn render_agent(&self, position: usize, agent: &AgentRecord) {
        let styles = &self.ctx.styles;
        println!();
        println!(
            "  {}",
            format!("Agent #{position}: {}", agent.name).style(styles.header)
        );
        println!();
        let verdict = validate_api_key(&agent.api_key_variable_name);
        let key = format!("{} ({})", mask_key(&agent.api_key_variable_name), verdict.reason());
        let rows: [(&str, String); 8] = [
            ("id:", agent.id.clone()),
            ("apiKeyVariableName:", key),
            ("apiUrl:", agent.api_url.clone()),
            ("model:", agent.model.clone()),
            ("temperature:", agent.temperature.to_string()),
            ("max_tokens:", agent.max_tokens.to_string()),
            ("welcomeMessage:", agent.welcome_message.clone()),
            ("systemPrompt:", String::new()),
        ];
        for (key, value) in &rows {
            println!("  {:<20} {value}", key.style(styles.dim));
        }
        for line in agent.system_prompt.lines() {
            println!("    {line}");
        }
        if !agent.extra.is_empty() {
            let keys: Vec<&str> = agent.extra.keys().map(String::as_str).collect();
            println!("  {:<20} {}", "other keys:".style(styles.dim), keys.join(", "));
        }
        println!();
    }

    /// Render backups, most recent first.
    pub fn render_backup_list(&self, backups: &[BackupName], dir: &Path) {
        if backups.is_empty() {
            if !self.ctx.quiet {
                println!("No backups in {}", dir.display());
            }
            return;
        }
        let styles = &self.ctx.styles;
        println!(
            "  {}",
            format!("{:<42} {:<11} {}", "ID", "KIND", "TAKEN").style(styles.dim)
        );
        for backup in backups {
            let taken = backup
                .taken_at()
                .map_or_else(String::new, |t| t.format("%Y-%m-%d %H:%M:%S").to_string());
            println!(
                "  {:<42} {:<11} {taken}",
                backup.file_name(),
                backup.kind.label()
            );
        }
    }

    /// Render the records contained in a backup without applying them.
    pub fn render_backup_contents(&self, id: &str, agents: &[AgentRecord]) {
        self.ctx.header(&format!("{id} ({} agents)", agents.len()));
        self.render_agent_list(agents, None);
    }

    /// Render key check verdicts, one line per record.
    pub fn render_key_reports(&self, reports: &[KeyReport]) {
        if reports.is_empty() {
            if !self.ctx.quiet {
                println!("No agents to check.");
            }
            return;
        }
        let styles = &self.ctx.styles;
        for report in reports {
            let mark = if report.accepted {
                format!("{}", "✓".style(styles.success))
            } else {
                format!("{}", "✗".style(styles.error))
            };
            println!(
                "  {mark} {:>3}  {:<28} {:<24} {}",
                report.position,
                truncate(&report.name, 28),
                report.key_preview,
                report.reason
            );
        }
        let rejected = reports.iter().filter(|r| !r.accepted).count();
        println!();
        if rejected == 0 {
            self.ctx
                .success(&format!("All {} keys look valid", reports.len()));
        } else {
            self.ctx.warn(&format!(
                "{rejected} of {} keys need attention",
                reports.len()
            ));
        }
    }

    /// Render the current configuration.
    pub fn render_config(&self, config: &EditorConfig, path: &Path, token_source: &str) {
        let styles = &self.ctx.styles;
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(styles.header)
        );
        println!();
        println!("  {:<22} {}", "store.agents_file:", config.store.agents_file);
        println!("  {:<22} {}", "store.backup_dir:", config.store.backup_dir);
        println!("  {:<22} {}", "store.max_backups:", config.store.max_backups);
        println!("  {:<22} {}", "remote.owner:", or_unset(&config.remote.owner));
        println!("  {:<22} {}", "remote.repo:", or_unset(&config.remote.repo));
        println!("  {:<22} {}", "remote.branch:", config.remote.branch);
        println!("  {:<22} {}", "remote.file_path:", config.remote.file_path);
        println!("  {:<22} {token_source}", "remote token:");
        println!();
        println!("  {}", "Environment:".style(styles.bold));
        for var in ["AGENT_EDITOR_CONFIG", "AGENT_EDITOR_GITHUB_API_URL", "NO_COLOR"] {
            println!(
                "    {:<30} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
    }
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() { "(not set)" } else { value }
}

/// Shorten `s` to at most `max` characters, marking the cut with `…`.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}
