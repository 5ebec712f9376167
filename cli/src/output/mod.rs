//! Terminal output: message helpers, renderers and progress reporting.

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::{OwoColorize as _, Style};

pub use human::HumanRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Styling and terminal state for one invocation.
///
/// Results go to stdout; warnings, errors and spinners go to stderr so that
/// `--json` output stays machine-readable.
pub struct OutputContext {
    pub styles: Styles,
    /// Whether stderr, where spinners draw, is a terminal.
    pub interactive: bool,
    /// Suppress everything except errors.
    pub quiet: bool,
}

impl OutputContext {
    /// Colors are used only when stdout is a terminal and neither
    /// `--no-color` nor `NO_COLOR` is set.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let colors =
            !no_color && std::env::var_os("NO_COLOR").is_none() && Term::stdout().is_term();
        Self {
            styles: if colors {
                Styles::colored()
            } else {
                Styles::default()
            },
            interactive: Term::stderr().is_term(),
            quiet,
        }
    }

    /// Whether a spinner should be drawn.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.interactive && !self.quiet
    }

    fn line(&self, glyph: &str, style: Style, msg: &str) -> String {
        format!("  {} {msg}", glyph.style(style))
    }

    /// `✓ msg` on stdout.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", self.line("✓", self.styles.success, msg));
        }
    }

    /// `⚠ msg` on stderr.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            eprintln!("{}", self.line("⚠", self.styles.warning, msg));
        }
    }

    /// `✗ msg` on stderr, even when quiet.
    pub fn error(&self, msg: &str) {
        eprintln!("{}", self.line("✗", self.styles.error, msg));
    }

    /// `ℹ msg` on stdout.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", self.line("ℹ", self.styles.info, msg));
        }
    }

    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }
}
