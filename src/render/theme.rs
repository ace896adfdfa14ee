// Colorize seam over the console crate

use console::Style;

/// Color markup for the output stream.
///
/// `plain` disables styling entirely, which keeps captured output
/// byte-stable in tests and when the sink is not a terminal.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    colored: bool,
}

impl Theme {
    pub fn colored() -> Self {
        Self { colored: true }
    }

    pub fn plain() -> Self {
        Self { colored: false }
    }

    pub fn is_colored(&self) -> bool {
        self.colored
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.colored {
            style.force_styling(true).apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn red(&self, text: &str) -> String {
        self.paint(Style::new().red(), text)
    }

    pub fn green(&self, text: &str) -> String {
        self.paint(Style::new().green(), text)
    }

    pub fn yellow(&self, text: &str) -> String {
        self.paint(Style::new().yellow(), text)
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(Style::new().dim(), text)
    }

    /// Failure banner styling.
    pub fn banner(&self, text: &str) -> String {
        self.paint(Style::new().red().bold(), text)
    }
}
