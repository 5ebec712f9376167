//! `agent-editor sync`: save locally, then upload to the configured repository.

use anyhow::Result;
use std::process::ExitCode;

use crate::app::AppContext;
use crate::application::ports::ConfigStore as _;
use crate::application::services::remote_sync::sync_agents;
use crate::infra::config::resolve_token;
use crate::infra::remote::GithubContentApi;
use crate::output::{OutputContext, TerminalReporter, json};

/// Run the sync command.
///
/// # Errors
///
/// Returns an error if the remote is not configured, the local save fails,
/// or the API rejects a request.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let remote = &app.config.remote;
    let token = resolve_token(&app.config_store.path()?);
    if token.is_none() {
        tracing::debug!("no token found; calling the API unauthenticated");
    }
    let api = GithubContentApi::from_env(token);

    let store = app.open_store();
    let outcome = if app.is_json() {
        // Progress lines would corrupt the JSON on stdout.
        let silent = OutputContext::new(true, true);
        let reporter = TerminalReporter::new(&silent);
        sync_agents(&store, &api, remote, &app.clock, &reporter)?
    } else {
        let reporter = TerminalReporter::with_spinner(&app.output, "Syncing...");
        sync_agents(&store, &api, remote, &app.clock, &reporter)?
    };

    if app.is_json() {
        println!(
            "{}",
            json::to_pretty(&serde_json::json!({
                "owner": remote.owner,
                "repo": remote.repo,
                "branch": remote.branch,
                "file_path": remote.file_path,
                "created": outcome.created,
                "agents": store.len(),
                "local_backup": outcome.backup.map(|b| b.file_name()),
            }))?
        );
    } else if outcome.created {
        app.output
            .info(&format!("Created {} in the repository", remote.file_path));
    }
    Ok(ExitCode::SUCCESS)
}

