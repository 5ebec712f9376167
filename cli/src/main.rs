//! agent-editor - edit the agents file of a chat front-end, with backups

#![cfg_attr(test, allow(clippy::expect_used))]

use std::process::ExitCode;

use agent_editor_cli::cli::Cli;
use agent_editor_cli::output::json;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let as_json = cli.json;
    match cli.run() {
        Ok(code) => code,
        Err(e) => {
            let message = format!("{e:#}");
            match as_json.then(|| json::format_error(&message, json::error_code(&e))) {
                Some(Ok(obj)) => println!("{obj}"),
                _ => eprintln!("Error: {message}"),
            }
            ExitCode::FAILURE
        }
    }
}
