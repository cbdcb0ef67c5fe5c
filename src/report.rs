//! Colored console reporting for user-facing messages

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Severity of a console message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    fn color(&self) -> Color {
        match self {
            Level::Info => Color::Cyan,
            Level::Success => Color::Green,
            Level::Warning => Color::Yellow,
            Level::Error => Color::Red,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Success => "ok",
            Level::Warning => "warn",
            Level::Error => "error",
        }
    }
}

/// Console reporter with colored severity tags; errors go to stderr.
pub struct Reporter {
    color_choice: ColorChoice,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter {
    pub fn new() -> Self {
        Self {
            color_choice: ColorChoice::Auto,
        }
    }

    pub fn with_color_choice(color_choice: ColorChoice) -> Self {
        Self { color_choice }
    }

    pub fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    pub fn success(&self, message: &str) {
        self.emit(Level::Success, message);
    }

    pub fn warning(&self, message: &str) {
        self.emit(Level::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }

    fn emit(&self, level: Level, message: &str) {
        let mut stream = match level {
            Level::Error => StandardStream::stderr(self.color_choice),
            _ => StandardStream::stdout(self.color_choice),
        };

        // Coloring failures degrade to plain text
        let _ = stream.set_color(ColorSpec::new().set_fg(Some(level.color())).set_bold(true));
        let _ = write!(stream, "[{}]", level.tag());
        let _ = stream.reset();
        let _ = writeln!(stream, " {}", message);
    }
}
