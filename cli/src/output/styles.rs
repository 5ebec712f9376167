//! Output styles (owo-colors stylesheet)

use owo_colors::Style;

/// Stylesheet for terminal output. The default is plain text.
#[derive(Default, Clone)]
pub struct Styles {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub info: Style,
    /// Table headings and field labels
    pub dim: Style,
    pub bold: Style,
    pub header: Style,
    /// Marker for the selected record
    pub selected: Style,
}

impl Styles {
    /// Stylesheet used when stdout is a color-capable terminal.
    #[must_use]
    pub fn colored() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            info: Style::new().blue(),
            dim: Style::new().dimmed(),
            bold: Style::new().bold(),
            header: Style::new().bold().cyan(),
            selected: Style::new().bold().magenta(),
        }
    }
}
