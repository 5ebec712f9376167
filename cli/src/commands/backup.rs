//! `agent-editor backup`: manage snapshots of the agents file.

use anyhow::Result;
use clap::Subcommand;
use std::process::ExitCode;

use crate::app::AppContext;
use crate::output::json::{self, AgentSummary, BackupSummary};

/// Backup subcommands. A backup is identified by its file name.
#[derive(Subcommand)]
pub enum BackupCommand {
    /// Snapshot the current agents
    Create,
    /// List backups, most recent first
    List,
    /// Show the agents inside a backup
    Show {
        /// Backup file name
        id: String,
    },
    /// Replace the agents with a backup and save
    Restore {
        /// Backup file name
        id: String,
    },
    /// Remove a backup
    Delete {
        /// Backup file name
        id: String,
    },
    /// Remove the oldest backups beyond a limit
    Prune {
        /// Backups to keep (defaults to store.max_backups)
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
        keep: Option<u32>,
    },
}

/// Run the backup command.
///
/// # Errors
///
/// Returns an error for an unknown or invalid backup id, or when a backup
/// cannot be read, written or removed.
pub fn run(app: &AppContext, cmd: BackupCommand) -> Result<ExitCode> {
    match cmd {
        BackupCommand::Create => create(app),
        BackupCommand::List => list(app),
        BackupCommand::Show { id } => show(app, &id),
        BackupCommand::Restore { id } => restore(app, &id),
        BackupCommand::Delete { id } => delete(app, &id),
        BackupCommand::Prune { keep } => prune(app, keep),
    }
}

fn create(app: &AppContext) -> Result<ExitCode> {
    let store = app.open_store();
    let name = store.create_manual_backup()?;
    if app.is_json() {
        println!("{}", json::to_pretty(&BackupSummary::from(&name))?);
    } else {
        app.output
            .success(&format!("Backed up {} agents as {name}", store.len()));
    }
    Ok(ExitCode::SUCCESS)
}

fn list(app: &AppContext) -> Result<ExitCode> {
    let store = app.open_store();
    let backups = store.list_backups()?;
    if app.is_json() {
        let rows: Vec<BackupSummary> = backups.iter().map(BackupSummary::from).collect();
        println!("{}", json::to_pretty(&rows)?);
    } else {
        app.renderer()
            .render_backup_list(&backups, &store.layout().backup_dir);
    }
    Ok(ExitCode::SUCCESS)
}

fn show(app: &AppContext, id: &str) -> Result<ExitCode> {
    let store = app.open_store();
    let agents = store.read_backup(id)?;
    if app.is_json() {
        let rows: Vec<AgentSummary<'_>> = agents
            .iter()
            .enumerate()
            .map(|(i, a)| AgentSummary::new(i, a, None))
            .collect();
        println!("{}", json::to_pretty(&rows)?);
    } else {
        app.renderer().render_backup_contents(id, &agents);
    }
    Ok(ExitCode::SUCCESS)
}

fn restore(app: &AppContext, id: &str) -> Result<ExitCode> {
    let mut store = app.open_store();
    if !app.confirm(
        &format!("Replace the current {} agents with {id}?", store.len()),
        true,
    )? {
        app.output.info("Cancelled");
        return Ok(ExitCode::SUCCESS);
    }
    let count = store.restore_backup(id)?;
    let previous = store.save()?;
    if app.is_json() {
        println!(
            "{}",
            json::to_pretty(&serde_json::json!({
                "restored": id,
                "agents": count,
                "previous_file_backup": previous.map(|b| b.file_name()),
            }))?
        );
    } else {
        app.output
            .success(&format!("Restored {count} agents from {id}"));
        if let Some(previous) = previous {
            app.output
                .info(&format!("Previous file backed up as {previous}"));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn delete(app: &AppContext, id: &str) -> Result<ExitCode> {
    let store = app.open_store();
    if !app.confirm(&format!("Delete backup {id}?"), true)? {
        app.output.info("Cancelled");
        return Ok(ExitCode::SUCCESS);
    }
    store.delete_backup(id)?;
    if app.is_json() {
        println!("{}", json::to_pretty(&serde_json::json!({ "deleted": id }))?);
    } else {
        app.output.success(&format!("Deleted {id}"));
    }
    Ok(ExitCode::SUCCESS)
}

fn prune(app: &AppContext, keep: Option<u32>) -> Result<ExitCode> {
    let store = app.open_store();
    let keep = keep.map_or(app.config.store.max_backups, |k| k as usize);
    let removed = store.prune_backups(keep)?;
    if app.is_json() {
        let rows: Vec<BackupSummary> = removed.iter().map(BackupSummary::from).collect();
        println!("{}", json::to_pretty(&rows)?);
    } else if removed.is_empty() {
        app.output
            .info(&format!("Nothing to prune (keeping up to {keep})"));
    } else {
        app.output.success(&format!(
            "Removed {} old backups, kept the newest {keep}",
            removed.len()
        ));
    }
    Ok(ExitCode::SUCCESS)
}
