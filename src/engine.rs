//! Render engine: chain execution and single-record rendering.

use std::sync::Arc;

use futures::future;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde_json::Value;

use crate::error::{RenderError, Stage};
use crate::helper::{HelperRegistry, UnknownHelper};
use crate::path::PathSpec;
use crate::template::{Property, Step};

/// Options controlling a render pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Maximum number of property chains in flight per pass; `None` means
    /// one concurrent unit per property, unthrottled.
    pub max_concurrency: Option<usize>,
}

/// Engine for rendering input records through a compiled template.
///
/// The engine owns the helper registry, the property list, and an output
/// skeleton that every render pass starts from. Properties are immutable for
/// the lifetime of the engine; each pass clones the skeleton so rendered
/// values never alias engine state.
#[derive(Debug)]
pub struct RenderEngine {
    registry: HelperRegistry,
    properties: Arc<Vec<Property>>,
    skeleton: Value,
    options: RenderOptions,
}

impl RenderEngine {
    /// Create a new render engine.
    pub fn new(
        registry: HelperRegistry,
        properties: Vec<Property>,
        skeleton: Value,
        options: RenderOptions,
    ) -> Self {
        Self {
            registry,
            properties: Arc::new(properties),
            skeleton,
            options,
        }
    }

    /// Get the helper registry.
    pub fn registry(&self) -> &HelperRegistry {
        &self.registry
    }

    /// Get the property descriptors.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Get the render options.
    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Render one input record into a fully populated output value.
    ///
    /// Every property's chain runs concurrently against the shared input
    /// record; the pass completes when all chains have finished and their
    /// results are written at their paths, or fails with the first chain
    /// error. On failure no partial output is ever returned. No ordering is
    /// guaranteed between properties.
    pub async fn render(&self, data: &Value) -> Result<Value, RenderError> {
        let units = self.properties.iter().map(|property| {
            let registry = &self.registry;
            async move {
                let value = run_chain(registry, &property.path, &property.fns, data.clone()).await?;
                Ok::<_, RenderError>((&property.path, value))
            }
        });

        let results: Vec<(&PathSpec, Value)> = match self.options.max_concurrency {
            Some(limit) => {
                stream::iter(units)
                    .buffer_unordered(limit.max(1))
                    .try_collect()
                    .await?
            }
            None => future::try_join_all(units).await?,
        };

        let mut output = self.skeleton.clone();
        for (path, value) in results {
            path.set(&mut output, value)
                .map_err(|e| RenderError::new(Stage::Write, path.as_str(), e))?;
        }

        Ok(output)
    }
}

/// Run one property's step chain: a sequential fold over the steps, seeded
/// with the input record, short-circuiting on the first failing step. An
/// empty chain completes with the seed unchanged.
pub(crate) async fn run_chain(
    registry: &HelperRegistry,
    path: &PathSpec,
    steps: &[Step],
    seed: Value,
) -> Result<Value, RenderError> {
    let mut accumulator = seed;
    for step in steps {
        let helper = registry.get(&step.helper).ok_or_else(|| {
            RenderError::new(
                Stage::Lookup,
                path.as_str(),
                UnknownHelper(step.helper.clone()),
            )
        })?;

        accumulator = helper
            .call(accumulator, &step.args)
            .await
            .map_err(|e| RenderError::new(Stage::Step, path.as_str(), e))?;
    }
    Ok(accumulator)
}
