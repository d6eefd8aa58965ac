//! Miette integration for pretty error reporting.

use miette::{Diagnostic, Severity};
use thiserror::Error;

use super::RenderError;

/// A diagnostic wrapper for render errors compatible with miette.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct RenderDiagnostic {
    /// The error message
    pub message: String,

    #[source]
    /// The underlying error source
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,

    #[help]
    /// Help text for the user
    pub help: Option<String>,

    #[diagnostic(severity)]
    /// Severity level
    pub severity: Severity,
}

impl From<RenderError> for RenderDiagnostic {
    fn from(e: RenderError) -> Self {
        RenderDiagnostic {
            message: format!("[{}] on '{}'", e.stage, e.target),
            source: Some(e.error),
            help: Some("Check your template properties and helper registrations".into()),
            severity: Severity::Error,
        }
    }
}

impl From<RenderError> for miette::Report {
    fn from(e: RenderError) -> Self {
        miette::Report::new(RenderDiagnostic::from(e))
    }
}
