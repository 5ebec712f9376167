//! `agent-editor version`: print the build version.

use anyhow::Result;
use std::process::ExitCode;

use crate::output::{HumanRenderer, OutputContext, json};

/// Run the version command. Needs no configuration, so it never fails on a
/// broken config file.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(output: &OutputContext, as_json: bool) -> Result<ExitCode> {
    let version = env!("CARGO_PKG_VERSION");
    if as_json {
        println!("{}", json::to_pretty(&serde_json::json!({ "version": version }))?);
    } else {
        HumanRenderer::new(output).render_version(version);
    }
    Ok(ExitCode::SUCCESS)
}
