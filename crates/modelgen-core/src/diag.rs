//! Advisory diagnostics.
//!
//! Every pipeline stage takes a `&mut dyn Diagnostics` so that one pass owns
//! its sink. Nothing reported here changes control flow; fatal problems are
//! returned as [`crate::Error`].

use std::fmt;

///
/// Level
///

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Level {
    Debug,
    Info,
    Warn,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
        };

        f.write_str(label)
    }
}

///
/// Diagnostic
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    pub level: Level,

    /// The declaration or file the message is about.
    pub subject: String,

    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.level, self.subject, self.message)
    }
}

///
/// Diagnostics
///

pub trait Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic);

    fn debug(&mut self, subject: &str, message: &str) {
        self.report(Diagnostic {
            level: Level::Debug,
            subject: subject.to_string(),
            message: message.to_string(),
        });
    }

    fn info(&mut self, subject: &str, message: &str) {
        self.report(Diagnostic {
            level: Level::Info,
            subject: subject.to_string(),
            message: message.to_string(),
        });
    }

    fn warn(&mut self, subject: &str, message: &str) {
        self.report(Diagnostic {
            level: Level::Warn,
            subject: subject.to_string(),
            message: message.to_string(),
        });
    }
}

///
/// TracingDiagnostics
/// forwards to `tracing` under the `modelgen` target
///

#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        let Diagnostic {
            level,
            subject,
            message,
        } = diagnostic;

        match level {
            Level::Debug => tracing::debug!(target: "modelgen", %subject, "{message}"),
            Level::Info => tracing::info!(target: "modelgen", %subject, "{message}"),
            Level::Warn => tracing::warn!(target: "modelgen", %subject, "{message}"),
        }
    }
}

///
/// DiagnosticLog
/// records everything, in order
///

#[derive(Clone, Debug, Default)]
pub struct DiagnosticLog {
    pub entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn at_level(&self, level: Level) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |entry| entry.level == level)
    }

    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|entry| entry.message.contains(needle))
    }
}

impl Diagnostics for DiagnosticLog {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }
}

///
/// TESTS
///
