//! Diagnostic sinks for parse and liveness messages

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};

/// Severity of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A human-readable message produced while parsing or checking a proxy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// Receiver for diagnostics emitted by the parser and the liveness checker
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: &Diagnostic);
}

/// Forwards diagnostics to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        match diagnostic.severity {
            Severity::Info => log::info!("{}", diagnostic.message),
            Severity::Warning => log::warn!("{}", diagnostic.message),
            Severity::Error => log::error!("{}", diagnostic.message),
        }
    }
}

/// Keeps every diagnostic in memory
///
/// Clones share the same buffer, so a clone can be handed to a parser or
/// checker while the original is kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    entries: Arc<Mutex<Vec<Diagnostic>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the collected diagnostics, oldest first
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.diagnostics().into_iter().map(|d| d.message).collect()
    }

    pub fn clear(&self) {
        match self.entries.lock() {
            Ok(mut entries) => entries.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        match self.entries.lock() {
            Ok(mut entries) => entries.push(diagnostic.clone()),
            Err(poisoned) => poisoned.into_inner().push(diagnostic.clone()),
        }
    }
}
