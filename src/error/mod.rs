//! Error types for render operations.
//!
//! This module provides:
//! - `Stage`: Indicates where an error occurred in the render pipeline
//! - `RenderError`: A single render error with context
//! - `BoxError`: The boxed error type helpers report failures with

use std::fmt;

/// Boxed error type used for helper failures and error sources.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Stage of the render pipeline where an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Invalid engine or stream configuration, detected before any work runs
    Configure,
    /// Helper name lookup in the registry
    Lookup,
    /// A helper reported a failure while executing a chain step
    Step,
    /// Error while writing a chain result into the output value
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Configure => write!(f, "Configure"),
            Stage::Lookup => write!(f, "Lookup"),
            Stage::Step => write!(f, "Step"),
            Stage::Write => write!(f, "Write"),
        }
    }
}

#[derive(Debug)]
pub struct RenderError {
    /// Stage where the error occurred
    pub stage: Stage,
    /// Identifier of the target (property path, or the surface that was
    /// misconfigured for `Configure` errors)
    pub target: String,
    /// The underlying error
    pub error: BoxError,
}

impl RenderError {
    /// Create a new render error.
    pub fn new(stage: Stage, target: impl Into<String>, error: impl Into<BoxError>) -> Self {
        Self {
            stage,
            target: target.into(),
            error: error.into(),
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.stage, self.target, self.error)
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.error.as_ref())
    }
}

#[cfg(feature = "miette")]
mod miette_impl;

#[cfg(feature = "miette")]
pub use miette_impl::*;
