//! `agent-editor config`: show and set configuration values.

use anyhow::{Context, Result};
use clap::Subcommand;
use std::process::ExitCode;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::config_service;
use crate::infra::config::{TOKEN_ENV, save_token, token_path};
use crate::output::json;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
    /// Store the repository access token (read from stdin with --yes)
    SetToken,
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error for an unknown key, an invalid value, or when the
/// configuration or token file cannot be written.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show_config(app),
        ConfigCommand::Set { key, value } => set_config(app, &key, &value),
        ConfigCommand::SetToken => set_token(app),
    }
}

fn show_config(app: &AppContext) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let path = app.config_store.path()?;
    let source = token_source(&path);
    if app.is_json() {
        println!(
            "{}",
            json::to_pretty(&serde_json::json!({
                "path": path.display().to_string(),
                "config": config,
                "token": source,
            }))?
        );
    } else {
        app.renderer().render_config(&config, &path, source);
    }
    Ok(ExitCode::SUCCESS)
}

fn set_config(app: &AppContext, key: &str, value: &str) -> Result<ExitCode> {
    config_service::set_value(&app.config_store, key, value)?;
    app.output.success(&format!("Set {key} = {value}"));
    Ok(ExitCode::SUCCESS)
}

fn set_token(app: &AppContext) -> Result<ExitCode> {
    let token = if app.non_interactive {
        let mut line = String::new();
        std::io::stdin()
            .read_line(&mut line)
            .context("reading token from stdin")?;
        line
    } else {
        dialoguer::Password::new()
            .with_prompt("Access token")
            .interact()
            .context("reading token")?
    };
    let path = save_token(&app.config_store.path()?, &token)?;
    app.output
        .success(&format!("Token saved to {}", path.display()));
    if std::env::var(TOKEN_ENV).is_ok() {
        app.output
            .warn(&format!("{TOKEN_ENV} is set and takes precedence over the saved token"));
    }
    Ok(ExitCode::SUCCESS)
}

/// Where `sync` would take its token from. Never reveals the token itself.
fn token_source(config_path: &std::path::Path) -> &'static str {
    if std::env::var(TOKEN_ENV).is_ok_and(|t| !t.trim().is_empty()) {
        "GITHUB_TOKEN"
    } else if token_path(config_path).exists() {
        "token file"
    } else {
        "(none)"
    }
}
