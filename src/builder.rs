//! Builder for creating RenderEngine instances.

use std::future::Future;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::engine::{RenderEngine, RenderOptions};
use crate::error::{BoxError, RenderError, Stage};
use crate::helper::{Helper, HelperRegistry};
use crate::path::PathSpec;
use crate::template::{Property, Step, TemplateSpec};

pub struct RenderBuilder {
    registry: HelperRegistry,
    property_args: Vec<(String, Vec<Step>)>,
    properties: Vec<Property>,
    skeleton: Value,
    options: RenderOptions,
}

impl RenderBuilder {
    pub fn new(registry: HelperRegistry) -> Self {
        Self {
            registry,
            property_args: Vec::new(),
            properties: Vec::new(),
            skeleton: Value::Object(Map::new()),
            options: RenderOptions::default(),
        }
    }

    pub fn with_helper(mut self, name: impl Into<String>, helper: Arc<dyn Helper>) -> Self {
        self.registry.register(name, helper);
        self
    }

    pub fn with_helper_fn<F, Fut>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value, Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, BoxError>> + Send + 'static,
    {
        self.registry.register_fn(name, f);
        self
    }

    /// Add a property from a raw path string; the path is parsed at build
    /// time and a malformed path fails `build` with a Configure error.
    pub fn add_property(mut self, path: impl Into<String>, fns: Vec<Step>) -> Self {
        self.property_args.push((path.into(), fns));
        self
    }

    /// Add a pre-built property descriptor.
    pub fn add_property_spec(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Set the output skeleton every render pass starts from. Defaults to an
    /// empty object.
    pub fn with_template(mut self, skeleton: Value) -> Self {
        self.skeleton = skeleton;
        self
    }

    /// Cap the number of property chains in flight per render pass.
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.options.max_concurrency = Some(limit);
        self
    }

    pub fn build(self) -> Result<RenderEngine, RenderError> {
        let mut properties = Vec::with_capacity(self.property_args.len() + self.properties.len());

        for (raw, fns) in self.property_args {
            let path = PathSpec::parse(&raw)
                .map_err(|e| RenderError::new(Stage::Configure, raw.clone(), e))?;
            properties.push(Property { path, fns });
        }

        // Add pre-built descriptors
        properties.extend(self.properties);

        Ok(RenderEngine::new(
            self.registry,
            properties,
            self.skeleton,
            self.options,
        ))
    }

    pub fn from_template_spec(spec: TemplateSpec, registry: HelperRegistry) -> Self {
        let mut builder = RenderBuilder::new(registry);
        builder.properties = spec.properties;
        builder
    }
}

impl Default for RenderBuilder {
    fn default() -> Self {
        RenderBuilder::new(crate::helper::default_registry())
    }
}
