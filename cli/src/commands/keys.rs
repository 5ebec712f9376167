//! `agent-editor keys`: API key format checks.

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::app::AppContext;
use crate::application::services::key_check;
use crate::domain::agent::{mask_key, validate_api_key};
use crate::output::json;

/// Keys subcommands.
#[derive(Subcommand)]
pub enum KeysCommand {
    /// Check every key in an agents file without modifying it
    Check {
        /// File to check (defaults to the configured agents file)
        #[arg(long, value_name = "PATH")]
        file_path: Option<PathBuf>,
    },
    /// Check a single key
    Validate {
        /// The key to check
        key: String,
    },
}

/// Run the keys command. Exits with status 1 when any key is rejected.
///
/// # Errors
///
/// Returns an error if the agents file cannot be read or parsed.
pub fn run(app: &AppContext, cmd: KeysCommand) -> Result<ExitCode> {
    match cmd {
        KeysCommand::Check { file_path } => check(app, file_path),
        KeysCommand::Validate { key } => validate(app, &key),
    }
}

fn check(app: &AppContext, file_path: Option<PathBuf>) -> Result<ExitCode> {
    let path = file_path.unwrap_or_else(|| app.layout().agents_file);
    let reports = key_check::check_file(&app.fs, &path)?;
    if app.is_json() {
        println!("{}", json::to_pretty(&reports)?);
    } else {
        app.output.header(&format!("Keys in {}", path.display()));
        app.renderer().render_key_reports(&reports);
    }
    Ok(exit_code(key_check::all_accepted(&reports)))
}

fn validate(app: &AppContext, key: &str) -> Result<ExitCode> {
    let verdict = validate_api_key(key);
    if app.is_json() {
        println!(
            "{}",
            json::to_pretty(&serde_json::json!({
                "key_preview": mask_key(key),
                "accepted": verdict.is_accepted(),
                "reason": verdict.reason(),
            }))?
        );
    } else if verdict.is_accepted() {
        app.output.success(verdict.reason());
    } else {
        app.output.warn(verdict.reason());
    }
    Ok(exit_code(verdict.is_accepted()))
}

fn exit_code(accepted: bool) -> ExitCode {
    if accepted {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
