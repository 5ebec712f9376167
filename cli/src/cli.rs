//! Command-line interface (clap derive).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags, StoreFlags};
use crate::commands;

/// Edit the agents file of a chat front-end, with automatic backups
#[derive(Parser)]
#[command(
    name = "agent-editor",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Print results as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colors (NO_COLOR is honoured too)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Agents file to edit (overrides store.agents_file)
    #[arg(long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Backup directory (overrides store.backup_dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub backup_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List, show and edit agents
    #[command(subcommand)]
    Agents(commands::agents::AgentsCommand),

    /// Manage backup snapshots
    #[command(subcommand)]
    Backup(commands::backup::BackupCommand),

    /// Check API key formats
    #[command(subcommand)]
    Keys(commands::keys::KeysCommand),

    /// Save and upload the agents file to the configured repository
    Sync,

    /// Show or change settings and the access token
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Print the version
    Version,
}

impl Cli {
    /// Dispatch to the selected command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or the command
    /// fails.
    pub fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            file,
            backup_dir,
            command,
        } = self;

        if let Command::Version = command {
            let output = crate::output::OutputContext::new(no_color, quiet);
            return commands::version::run(&output, json);
        }

        let app = AppContext::new(AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes },
            store: StoreFlags {
                agents_file: file,
                backup_dir,
            },
        })?;

        match command {
            Command::Agents(cmd) => commands::agents::run(&app, cmd),
            Command::Backup(cmd) => commands::backup::run(&app, cmd),
            Command::Keys(cmd) => commands::keys::run(&app, cmd),
            Command::Sync => commands::sync::run(&app),
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::Version => Ok(ExitCode::SUCCESS),
        }
    }
}
