//! `agent-editor agents`: list, show and edit agent records.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::app::AppContext;
use crate::application::ports::LocalFs;
use crate::application::services::agent_store::ImportMode;
use crate::domain::agent::{AgentRecord, KeyVerdict, validate_api_key};
use crate::domain::backup::BackupName;
use crate::domain::error::StoreError;
use crate::output::json::{self, AgentSummary};

/// Agents subcommands. Positions are 1-based, as printed by `agents list`.
#[derive(Subcommand)]
pub enum AgentsCommand {
    /// List agents
    List,
    /// Show every field of an agent
    Show {
        /// Position in the list
        position: usize,
    },
    /// Create an agent from the default template
    New(NewArgs),
    /// Change fields of an agent
    Edit(EditArgs),
    /// Append a copy of an agent
    Duplicate {
        /// Position in the list
        position: usize,
    },
    /// Remove an agent
    Delete {
        /// Position in the list
        position: usize,
    },
    /// Load agents from another file
    Import(ImportArgs),
    /// Write the agents to another file
    Export {
        /// Destination file
        path: PathBuf,
    },
}

/// Field values; anything not given keeps its current (or template) value.
#[derive(Args, Default)]
pub struct FieldArgs {
    /// Record id
    #[arg(long)]
    pub id: Option<String>,
    /// Display name
    #[arg(long)]
    pub name: Option<String>,
    /// API key
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,
    /// Chat-completions endpoint
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,
    /// Model identifier
    #[arg(long)]
    pub model: Option<String>,
    /// System prompt text
    #[arg(long, value_name = "TEXT", conflicts_with = "system_prompt_file")]
    pub system_prompt: Option<String>,
    /// Read the system prompt from a file
    #[arg(long, value_name = "PATH")]
    pub system_prompt_file: Option<PathBuf>,
    /// Sampling temperature
    #[arg(long, allow_hyphen_values = true)]
    pub temperature: Option<f64>,
    /// Completion token limit
    #[arg(long)]
    pub max_tokens: Option<u32>,
    /// First message shown to the user
    #[arg(long, value_name = "TEXT")]
    pub welcome_message: Option<String>,
}

/// Arguments for `agents new`.
#[derive(Args)]
pub struct NewArgs {
    #[command(flatten)]
    pub fields: FieldArgs,
    /// Save even if the API key looks wrong or the agents file failed to load
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `agents edit`.
#[derive(Args)]
pub struct EditArgs {
    /// Position in the list
    pub position: usize,
    #[command(flatten)]
    pub fields: FieldArgs,
    /// Save even if the API key looks wrong
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `agents import`.
#[derive(Args)]
pub struct ImportArgs {
    /// File holding a JSON array of agents
    pub path: PathBuf,
    /// Discard the current agents
    #[arg(long, conflicts_with = "append")]
    pub replace: bool,
    /// Add to the current agents
    #[arg(long)]
    pub append: bool,
    /// Append even if the agents file failed to load
    #[arg(long)]
    pub force: bool,
}

/// Run the agents command.
///
/// # Errors
///
/// Returns an error if the record store rejects the operation or a file
/// cannot be read or written.
pub fn run(app: &AppContext, cmd: AgentsCommand) -> Result<ExitCode> {
    match cmd {
        AgentsCommand::List => list(app),
        AgentsCommand::Show { position } => show(app, position),
        AgentsCommand::New(args) => create(app, args),
        AgentsCommand::Edit(args) => edit(app, args),
        AgentsCommand::Duplicate { position } => duplicate(app, position),
        AgentsCommand::Delete { position } => delete(app, position),
        AgentsCommand::Import(args) => import(app, &args),
        AgentsCommand::Export { path } => export(app, &path),
    }
}

/// Convert a 1-based position into an index.
fn to_index(position: usize, len: usize) -> Result<usize> {
    if position == 0 || position > len {
        return Err(StoreError::IndexOutOfRange { position, len }.into());
    }
    Ok(position - 1)
}

fn list(app: &AppContext) -> Result<ExitCode> {
    let store = app.open_store();
    if app.is_json() {
        let rows: Vec<AgentSummary<'_>> = store
            .agents()
            .iter()
            .enumerate()
            .map(|(i, a)| AgentSummary::new(i, a, store.selection()))
            .collect();
        println!("{}", json::to_pretty(&rows)?);
    } else {
        app.renderer()
            .render_agent_list(store.agents(), store.selection());
    }
    Ok(ExitCode::SUCCESS)
}

fn show(app: &AppContext, position: usize) -> Result<ExitCode> {
    let mut store = app.open_store();
    let index = to_index(position, store.len())?;
    store.select(index)?;
    let agent = store.get(index)?;
    print_record(app, position, agent)?;
    Ok(ExitCode::SUCCESS)
}

fn create(app: &AppContext, args: NewArgs) -> Result<ExitCode> {
    let mut store = app.open_store();
    app.allow_overwrite_after_failed_load(&mut store, args.force)?;
    let mut record = store.new_record_template();
    apply_fields(&app.fs, &args.fields, &mut record)?;

    if !key_accepted(app, &record.api_key_variable_name, args.force)? {
        app.output.warn("Nothing saved");
        return Ok(ExitCode::FAILURE);
    }

    let index = store.add(record)?;
    let backup = store.save()?;
    report_saved(app, &format!("Added agent #{}", index + 1), backup.as_ref());
    print_record(app, index + 1, store.get(index)?)?;
    Ok(ExitCode::SUCCESS)
}

fn edit(app: &AppContext, args: EditArgs) -> Result<ExitCode> {
    let mut store = app.open_store();
    let index = to_index(args.position, store.len())?;
    let mut record = store.get(index)?.clone();
    apply_fields(&app.fs, &args.fields, &mut record)?;

    // Only a key given on this invocation is checked; other edits must stay
    // possible on records that already carry a rejected key.
    if args.fields.api_key.is_some()
        && !key_accepted(app, &record.api_key_variable_name, args.force)?
    {
        app.output.warn("Nothing saved");
        return Ok(ExitCode::FAILURE);
    }

    store.select(index)?;
    store.replace(index, record)?;
    let backup = store.save()?;
    report_saved(app, &format!("Updated agent #{}", args.position), backup.as_ref());
    print_record(app, args.position, store.get(index)?)?;
    Ok(ExitCode::SUCCESS)
}

fn duplicate(app: &AppContext, position: usize) -> Result<ExitCode> {
    let mut store = app.open_store();
    let index = to_index(position, store.len())?;
    let copy = store.duplicate(index)?;
    let backup = store.save()?;
    report_saved(
        app,
        &format!("Copied agent #{position} to #{}", copy + 1),
        backup.as_ref(),
    );
    if app.is_json() {
        print_record(app, copy + 1, store.get(copy)?)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn delete(app: &AppContext, position: usize) -> Result<ExitCode> {
    let mut store = app.open_store();
    let index = to_index(position, store.len())?;
    let name = store.get(index)?.name.clone();
    if !app.confirm(&format!("Delete agent #{position} \"{name}\"?"), true)? {
        app.output.info("Cancelled");
        return Ok(ExitCode::SUCCESS);
    }
    let removed = store.delete(index)?;
    let backup = store.save()?;
    report_saved(
        app,
        &format!("Deleted agent #{position} \"{}\"", removed.name),
        backup.as_ref(),
    );
    if app.is_json() {
        println!("{}", json::to_pretty(&removed)?);
    }
    Ok(ExitCode::SUCCESS)
}

fn import(app: &AppContext, args: &ImportArgs) -> Result<ExitCode> {
    let mut store = app.open_store();
    let mode = if args.replace {
        ImportMode::Replace
    } else if args.append || store.is_empty() {
        ImportMode::Append
    } else if app.confirm(
        &format!(
            "Replace the current {} agents? (No appends instead)",
            store.len()
        ),
        false,
    )? {
        ImportMode::Replace
    } else {
        ImportMode::Append
    };

    if mode == ImportMode::Append {
        app.allow_overwrite_after_failed_load(&mut store, args.force)?;
    }
    let count = store.import(&args.path, mode)?;
    let backup = store.save()?;
    let verb = match mode {
        ImportMode::Replace => "Replaced agents with",
        ImportMode::Append => "Appended",
    };
    report_saved(
        app,
        &format!("{verb} {count} agents from {}", args.path.display()),
        backup.as_ref(),
    );
    if app.is_json() {
        println!(
            "{}",
            json::to_pretty(&serde_json::json!({ "imported": count, "total": store.len() }))?
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn export(app: &AppContext, path: &Path) -> Result<ExitCode> {
    let store = app.open_store();
    store.export(path)?;
    if app.is_json() {
        println!(
            "{}",
            json::to_pretty(&serde_json::json!({
                "exported": store.len(),
                "path": path.display().to_string(),
            }))?
        );
    } else {
        app.output.success(&format!(
            "Exported {} agents to {}",
            store.len(),
            path.display()
        ));
    }
    Ok(ExitCode::SUCCESS)
}

/// Overwrite `record` with every field given on the command line.
fn apply_fields(fs: &impl LocalFs, fields: &FieldArgs, record: &mut AgentRecord) -> Result<()> {
    if let Some(id) = &fields.id {
        record.id.clone_from(id);
    }
    if let Some(name) = &fields.name {
        record.name.clone_from(name);
    }
    if let Some(key) = &fields.api_key {
        record.api_key_variable_name.clone_from(key);
    }
    if let Some(url) = &fields.api_url {
        record.api_url.clone_from(url);
    }
    if let Some(model) = &fields.model {
        record.model.clone_from(model);
    }
    if let Some(prompt) = &fields.system_prompt {
        record.system_prompt.clone_from(prompt);
    }
    if let Some(path) = &fields.system_prompt_file {
        let bytes = fs.read(path)?;
        record.system_prompt = String::from_utf8(bytes)
            .with_context(|| format!("{} is not UTF-8 text", path.display()))?;
    }
    if let Some(temperature) = fields.temperature {
        record.temperature = temperature;
    }
    if let Some(max_tokens) = fields.max_tokens {
        record.max_tokens = max_tokens;
    }
    if let Some(message) = &fields.welcome_message {
        record.welcome_message.clone_from(message);
    }
    Ok(())
}

/// Warn about a rejected key and decide whether to keep it.
///
/// Non-interactive runs keep a rejected key only with `--force`.
fn key_accepted(app: &AppContext, key: &str, force: bool) -> Result<bool> {
    let KeyVerdict::Rejected(issue) = validate_api_key(key) else {
        return Ok(true);
    };
    app.output
        .warn(&format!("The API key looks wrong: {}", issue.reason()));
    if force {
        return Ok(true);
    }
    if app.non_interactive {
        anyhow::bail!(
            "refusing to save an API key that is {}. Pass --force to save it anyway.",
            issue.reason()
        );
    }
    app.confirm("Save anyway?", false)
}

fn report_saved(app: &AppContext, message: &str, backup: Option<&BackupName>) {
    if app.is_json() {
        return;
    }
    app.output.success(message);
    if let Some(backup) = backup {
        app.output.info(&format!("Previous file backed up as {backup}"));
    }
}

fn print_record(app: &AppContext, position: usize, agent: &AgentRecord) -> Result<()> {
    if app.is_json() {
        println!("{}", json::to_pretty(agent)?);
    } else {
        app.renderer().render_agent(position, agent);
    }
    Ok(())
}
