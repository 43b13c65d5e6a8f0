//! Diagnostic Model: Severity, Descriptor, Location
//!
//! The chain never looks inside a diagnostic except for its severity, and
//! only when the caller opts into [`AbortPolicy::OnErrors`](crate::AbortPolicy).
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Fault;

/// Id of the diagnostic emitted when a step body fails inside `bind`.
pub const STEP_FAILURE_ID: &str = "MONAD0";

/// Id of the diagnostic emitted when the final consumer fails inside `sink`.
pub const SINK_FAILURE_ID: &str = "MONAD1";

/// Category shared by the synthetic failure diagnostics.
pub const INCREMENTAL_CATEGORY: &str = "Incremental";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Hidden,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Hidden => write!(f, "hidden"),
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Static description of a kind of diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiagnosticDescriptor {
    /// Stable id (ex: "MONAD0", "GEN001")
    pub id: String,
    /// Short title
    pub title: String,
    /// Grouping used by hosts when filtering
    pub category: String,
    pub severity: Severity,
    #[serde(default = "enabled")]
    pub enabled_by_default: bool,
}

fn enabled() -> bool {
    true
}

impl DiagnosticDescriptor {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            severity,
            enabled_by_default: true,
        }
    }
}

/// Where a diagnostic points to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Location {
    #[default]
    None,
    Source {
        path: String,
        line: u32,
        column: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    pub descriptor: DiagnosticDescriptor,
    pub message: String,
    #[serde(default)]
    pub location: Location,
}

impl Diagnostic {
    pub fn new(descriptor: DiagnosticDescriptor, message: impl Into<String>) -> Self {
        Self {
            descriptor,
            message: message.into(),
            location: Location::None,
        }
    }

    /// Shorthand for an error with the descriptor title equal to its id.
    pub fn error(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_severity(id.into(), Severity::Error, message)
    }

    pub fn warning(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_severity(id.into(), Severity::Warning, message)
    }

    pub fn info(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_severity(id.into(), Severity::Info, message)
    }

    fn with_severity(id: String, severity: Severity, message: impl Into<String>) -> Self {
        let descriptor = DiagnosticDescriptor::new(id.clone(), id, "General", severity);
        Self::new(descriptor, message)
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    pub fn severity(&self) -> Severity {
        self.descriptor.severity
    }

    pub fn is_error(&self) -> bool {
        self.descriptor.severity == Severity::Error
    }

    pub(crate) fn step_failure(fault: &Fault) -> Self {
        Self::unexpected(STEP_FAILURE_ID, fault)
    }

    pub(crate) fn sink_failure(fault: &Fault) -> Self {
        Self::unexpected(SINK_FAILURE_ID, fault)
    }

    fn unexpected(id: &str, fault: &Fault) -> Self {
        let descriptor = DiagnosticDescriptor::new(id, "Error", INCREMENTAL_CATEGORY, Severity::Error);
        Self::new(descriptor, format!("Unexpected error: {}", fault))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.severity(), self.id(), self.message)?;
        if let Location::Source { path, line, column } = &self.location {
            write!(f, " ({}:{}:{})", path, line, column)?;
        }
        Ok(())
    }
}
