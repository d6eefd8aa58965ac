//! Compiled template descriptors.
//!
//! A template reaches the engine already reduced to a list of properties,
//! each binding an output path to an ordered chain of helper steps. The
//! structs here are that wire form; `TemplateSpec` can be loaded from JSON
//! (and from YAML behind the `yaml` feature).

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::path::PathSpec;

/// One named helper invocation within a chain, with bound literal arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    /// Name of the helper to invoke
    pub helper: String,
    /// Literal arguments bound to this step
    #[serde(default)]
    pub args: Vec<Value>,
}

impl Step {
    /// Create a step with no bound arguments.
    pub fn new(helper: impl Into<String>) -> Self {
        Self {
            helper: helper.into(),
            args: Vec::new(),
        }
    }

    /// Set the bound literal arguments.
    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }
}

/// One output field: an output path plus its step chain.
#[derive(Debug, Clone, Deserialize)]
pub struct Property {
    /// Where the chain result is written in the output value
    pub path: PathSpec,
    /// Ordered step chain; empty means the raw input record is written as-is
    #[serde(default)]
    pub fns: Vec<Step>,
}

impl Property {
    /// Create a property with an empty chain.
    pub fn new(path: PathSpec) -> Self {
        Self {
            path,
            fns: Vec::new(),
        }
    }

    /// Append a step to the chain.
    pub fn with_step(mut self, step: Step) -> Self {
        self.fns.push(step);
        self
    }
}

/// The compiled-template input surface: every property of one template.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateSpec {
    /// Property descriptors
    #[serde(default)]
    pub properties: Vec<Property>,
}

/// Errors that can occur while loading a template spec.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// I/O error while reading the spec file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Deserialization error
    #[error("Serde error: {0}")]
    Serde(Box<dyn std::error::Error + Send + Sync>),

    /// The file extension does not map to a supported spec format
    #[error("unsupported template extension: '{0}'")]
    UnsupportedExtension(String),
}

impl TemplateSpec {
    /// Parse a template spec from JSON bytes.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, TemplateError> {
        serde_json::from_slice(bytes).map_err(|e| TemplateError::Serde(Box::new(e)))
    }

    /// Parse a template spec from YAML bytes.
    #[cfg(feature = "yaml")]
    pub fn from_yaml_slice(bytes: &[u8]) -> Result<Self, TemplateError> {
        serde_yaml::from_slice(bytes).map_err(|e| TemplateError::Serde(Box::new(e)))
    }

    /// Load a template spec from a file, dispatching on its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();

        let bytes = std::fs::read(path)?;
        match ext.as_str() {
            "json" => Self::from_json_slice(&bytes),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => Self::from_yaml_slice(&bytes),
            _ => Err(TemplateError::UnsupportedExtension(ext)),
        }
    }
}
