//! # json-render
//!
//! An asynchronous JSON template-rendering engine with pluggable helper chains.
//!
//! ## Overview
//!
//! json-render provides:
//! - **Property chains**: Each output field is bound to an ordered chain of
//!   transformation steps, threaded through a single accumulator
//! - **Async helpers**: Steps invoke named helpers registered by the caller;
//!   helpers may suspend for I/O (lookups, fetches) inside a template
//! - **Concurrent rendering**: All property chains of one record run
//!   concurrently against the shared input, with an optional fan-out cap
//! - **Stream sessions**: The same per-record rendering applied over a
//!   sequence of records, with `on_item`/`on_error`/`on_finish` handlers
//! - **Path writing**: Dot/bracket output paths with intermediate objects
//!   and arrays created on demand
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use json_render::{RenderBuilder, Step, default_registry};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = RenderBuilder::new(default_registry())
//!         .with_helper_fn("concat", |input, _args| async move {
//!             let first = input["first"].as_str().unwrap_or_default();
//!             let last = input["last"].as_str().unwrap_or_default();
//!             Ok(json!(format!("{first} {last}")))
//!         })
//!         .add_property("fullName", vec![Step::new("concat")])
//!         .build()?;
//!
//!     let out = engine.render(&json!({"first": "Cameron", "last": "Lee"})).await?;
//!     assert_eq!(out, json!({"fullName": "Cameron Lee"}));
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `yaml` - Load `TemplateSpec` from YAML files
//! - `miette` - Pretty error reporting with miette
//!
//! ## Rendering semantics
//!
//! - Within one chain, steps run strictly in order; a step's error aborts
//!   the chain and fails the whole render pass with that error.
//! - Across properties there is no ordering guarantee; properties are
//!   independent by contract and write disjoint output paths.
//! - A stream session renders records in input order, isolates per-record
//!   failures to `on_error`, and fires `on_finish` exactly once after the
//!   last record. Delivered values are owned by the handler; nothing the
//!   engine does afterwards can mutate an already delivered record.

// Core modules
pub mod builder;
pub mod engine;
pub mod error;
pub mod helper;
pub mod path;
pub mod stream;
pub mod template;

// Re-exports for convenience
pub use builder::RenderBuilder;
pub use engine::{RenderEngine, RenderOptions};
pub use error::{BoxError, RenderError, Stage};
pub use helper::{Helper, HelperRegistry, UnknownHelper, default_registry};
pub use path::{PathError, PathSpec, Segment};
pub use stream::StreamOptions;
pub use template::{Property, Step, TemplateError, TemplateSpec};

/// Build a RenderEngine from a TemplateSpec using the given helper registry.
pub fn build_engine_from_spec(
    spec: TemplateSpec,
    registry: HelperRegistry,
) -> Result<RenderEngine, RenderError> {
    RenderBuilder::from_template_spec(spec, registry).build()
}

/// Build a RenderEngine from a TemplateSpec, allowing the caller to further
/// customize the RenderBuilder before it is built. This is a natural hook
/// point for registering helpers or tweaking options based on the parsed
/// spec.
pub fn build_engine_from_spec_with<F>(
    spec: TemplateSpec,
    registry: HelperRegistry,
    customize: F,
) -> Result<RenderEngine, RenderError>
where
    F: FnOnce(RenderBuilder) -> RenderBuilder,
{
    let builder = RenderBuilder::from_template_spec(spec, registry);
    let builder = customize(builder);
    builder.build()
}

// Miette re-exports
#[cfg(feature = "miette")]
pub use error::RenderDiagnostic;

// Internal test modules (see src/tests)
#[cfg(test)]
mod tests;
