//! Application context: unified state passed to every command handler.
//!
//! `AppContext` owns the output settings, the loaded configuration and the
//! production port implementations. Command handlers borrow it and never
//! construct infrastructure themselves.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::ConfigStore as _;
use crate::application::services::agent_file::{LoadOutcome, StoreLayout};
use crate::application::services::agent_store::{AgentStore, OpenReport};
use crate::domain::config::EditorConfig;
use crate::domain::error::StoreError;
use crate::infra::clock::SystemClock;
use crate::infra::config::YamlConfigStore;
use crate::infra::fs::LocalFs;
use crate::output::{HumanRenderer, OutputContext};

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    /// One JSON document on stdout per invocation.
    Json,
}

/// `--no-color`, `--quiet` and `--json`.
pub struct OutputFlags {
    pub no_color: bool,
    pub quiet: bool,
    pub json: bool,
}

/// `--yes`.
pub struct BehaviourFlags {
    pub yes: bool,
}

/// Per-invocation overrides of the configured store paths.
#[derive(Default)]
pub struct StoreFlags {
    pub agents_file: Option<PathBuf>,
    pub backup_dir: Option<PathBuf>,
}

/// Global flags, grouped by concern.
pub struct AppFlags {
    pub output: OutputFlags,
    pub behaviour: BehaviourFlags,
    pub store: StoreFlags,
}

/// Everything a command handler needs for one invocation.
pub struct AppContext {
    pub output: OutputContext,
    pub mode: OutputMode,
    /// Prompts resolve to their default answer. Set by `--yes` or a `CI`
    /// environment variable.
    pub non_interactive: bool,
    pub config_store: YamlConfigStore,
    /// Configuration as loaded at start-up.
    pub config: EditorConfig,
    pub fs: LocalFs,
    pub clock: SystemClock,
    store_flags: StoreFlags,
}

impl AppContext {
    /// Load the configuration and wire up the production ports.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or parsed.
    pub fn new(flags: AppFlags) -> Result<Self> {
        let config_store = YamlConfigStore;
        let config = config_store.load()?;

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode: if flags.output.json {
                OutputMode::Json
            } else {
                OutputMode::Human
            },
            non_interactive: flags.behaviour.yes || std::env::var_os("CI").is_some(),
            config_store,
            config,
            fs: LocalFs,
            clock: SystemClock,
            store_flags: flags.store,
        })
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        matches!(self.mode, OutputMode::Json)
    }

    /// Human renderer over this context's output settings.
    #[must_use]
    pub fn renderer(&self) -> HumanRenderer<'_> {
        HumanRenderer::new(&self.output)
    }

    /// Store paths after applying `--file` / `--backup-dir`.
    #[must_use]
    pub fn layout(&self) -> StoreLayout {
        let configured = StoreLayout::from_config(&self.config.store);
        StoreLayout {
            agents_file: self
                .store_flags
                .agents_file
                .clone()
                .unwrap_or(configured.agents_file),
            backup_dir: self
                .store_flags
                .backup_dir
                .clone()
                .unwrap_or(configured.backup_dir),
        }
    }

    /// Rotate backups, load the primary file and report anything unusual.
    #[must_use]
    pub fn open_store(&self) -> AgentStore<'_, LocalFs, SystemClock> {
        let (store, report) = AgentStore::open(
            &self.fs,
            &self.clock,
            self.layout(),
            self.config.store.max_backups,
        );
        self.report_open(&store, &report);
        store
    }

    fn report_open(&self, store: &AgentStore<'_, LocalFs, SystemClock>, report: &OpenReport) {
        let path = store.layout().agents_file.display();
        if let Err(e) = &report.pruned {
            self.output.warn(&format!("Backup rotation failed: {e:#}"));
        }
        match &report.load {
            LoadOutcome::Loaded(_) | LoadOutcome::Empty => {}
            LoadOutcome::Created => {
                if !self.is_json() {
                    self.output.info(&format!("Created empty {path}"));
                }
            }
            LoadOutcome::Quarantined { backup, reason } => self.output.warn(&format!(
                "{path} was not valid JSON ({reason}). A copy was saved as {backup} and the file was reset."
            )),
            LoadOutcome::Failed(e) => self.output.warn(&format!(
                "Could not load {path}: {e:#}. Starting with an empty list; commands that save will ask before replacing the file."
            )),
        }
    }

    /// Decide whether a saving command may overwrite a primary file that
    /// failed to load.
    ///
    /// Without `--force`, only an interactive "yes" allows it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LoadFailed`] when the overwrite is not allowed.
    pub fn allow_overwrite_after_failed_load(
        &self,
        store: &mut AgentStore<'_, LocalFs, SystemClock>,
        force: bool,
    ) -> Result<()> {
        if store.loaded_cleanly() {
            return Ok(());
        }
        let path = store.layout().agents_file.display().to_string();
        let allowed = force
            || (!self.non_interactive
                && self.confirm(
                    &format!("{path} could not be loaded. Overwrite it anyway? (a backup is kept)"),
                    false,
                )?);
        if !allowed {
            return Err(anyhow::Error::from(StoreError::LoadFailed { path })
                .context("refusing to save without --force"));
        }
        store.allow_overwrite();
        Ok(())
    }

    /// Ask a yes/no question. Non-interactive runs get `default` without
    /// a prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be shown, for example without a
    /// terminal.
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(Into::into)
    }
}
