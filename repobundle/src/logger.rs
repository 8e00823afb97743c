//! Scoped, colorized console logging for the CLI.
//!
//! The library never prints; everything the user sees on stderr goes
//! through a [`Logger`]. Library-internal diagnostics travel separately via
//! `tracing`.

use std::fmt;

use console::{Style, Term};

/// Severity of a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Success,
    Warn,
    Error,
}

impl Level {
    fn label(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Success => "ok",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }

    fn style(self) -> Style {
        match self {
            Level::Debug => Style::new().dim(),
            Level::Info => Style::new().cyan(),
            Level::Success => Style::new().green(),
            Level::Warn => Style::new().yellow(),
            Level::Error => Style::new().red().bold(),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Logging capability handed to the command handlers.
pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str);

    /// A logger that prefixes every line with `scope`.
    fn scoped(&self, scope: &str) -> Box<dyn Logger>;

    fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn success(&self, message: &str) {
        self.log(Level::Success, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }
}

/// Writes styled lines to stderr.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    scope: Option<String>,
    show_debug: bool,
    term: Term,
}

impl ConsoleLogger {
    pub fn new(show_debug: bool) -> Self {
        Self {
            scope: None,
            show_debug,
            term: Term::stderr(),
        }
    }

    /// Copy of this logger with `scope` appended to the current one.
    pub fn with_scope(&self, scope: &str) -> Self {
        let scope = match &self.scope {
            Some(parent) => format!("{parent}:{scope}"),
            None => scope.to_string(),
        };
        Self {
            scope: Some(scope),
            show_debug: self.show_debug,
            term: self.term.clone(),
        }
    }

    /// Format one line without writing it.
    pub fn format_line(&self, level: Level, message: &str) -> String {
        let label = level.style().apply_to(format!("{level:>5}"));
        match &self.scope {
            Some(scope) => {
                let scope = Style::new().bold().apply_to(format!("[{scope}]"));
                format!("{label} {scope} {message}")
            }
            None => format!("{label} {message}"),
        }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, level: Level, message: &str) {
        if level == Level::Debug && !self.show_debug {
            return;
        }
        // A closed stderr is not worth failing the run over.
        let _ = self.term.write_line(&self.format_line(level, message));
    }

    fn scoped(&self, scope: &str) -> Box<dyn Logger> {
        Box::new(self.with_scope(scope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: String) -> String {
        console::strip_ansi_codes(&line).into_owned()
    }

    #[test]
    fn test_format_unscoped() {
        let logger = ConsoleLogger::new(false);
        assert_eq!(plain(logger.format_line(Level::Info, "hello")), " info hello");
        assert_eq!(plain(logger.format_line(Level::Error, "boom")), "error boom");
    }

    #[test]
    fn test_format_scoped() {
        let logger = ConsoleLogger::new(true);
        let scoped = ConsoleLogger {
            scope: Some("discover".to_string()),
            ..logger
        };
        assert_eq!(
            plain(scoped.format_line(Level::Success, "12 files")),
            "   ok [discover] 12 files"
        );
    }

    #[test]
    fn test_nested_scopes_join() {
        let logger = ConsoleLogger::new(false);
        let nested = logger.with_scope("scan").with_scope("classify");
        assert_eq!(
            plain(nested.format_line(Level::Warn, "slow")),
            " warn [scan:classify] slow"
        );
        // The parent keeps its own scope.
        assert_eq!(plain(logger.format_line(Level::Warn, "x")), " warn x");
    }
}
