//! Helper registry: named asynchronous transformation functions.
//!
//! A helper receives the accumulated chain value plus the step's bound
//! literal arguments and produces the next accumulated value. Helpers may
//! suspend (lookups, fetches); the engine makes no assumption about
//! synchronous vs. deferred completion.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::error::BoxError;
use crate::path::PathSpec;

/// A named transformation step implementation.
#[async_trait]
pub trait Helper: Send + Sync {
    /// Transform the accumulated value. `args` are the step's bound literal
    /// arguments from the template.
    async fn call(&self, input: Value, args: &[Value]) -> Result<Value, BoxError>;
}

/// A helper name that is not registered.
#[derive(Debug, Error)]
#[error("unknown helper: '{0}'")]
pub struct UnknownHelper(pub String);

struct FnHelper<F>(F);

#[async_trait]
impl<F, Fut> Helper for FnHelper<F>
where
    F: Fn(Value, Vec<Value>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, BoxError>> + Send + 'static,
{
    async fn call(&self, input: Value, args: &[Value]) -> Result<Value, BoxError> {
        (self.0)(input, args.to_vec()).await
    }
}

/// Registry mapping helper names to implementations.
#[derive(Clone, Default)]
pub struct HelperRegistry {
    helpers: HashMap<String, Arc<dyn Helper>>,
}

impl HelperRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            helpers: HashMap::new(),
        }
    }

    /// Register a helper implementation under a name. Re-registering a name
    /// replaces the previous helper.
    pub fn register(&mut self, name: impl Into<String>, helper: Arc<dyn Helper>) {
        self.helpers.insert(name.into(), helper);
    }

    /// Register an async closure as a helper.
    pub fn register_fn<F, Fut>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(Value, Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, BoxError>> + Send + 'static,
    {
        self.helpers.insert(name.into(), Arc::new(FnHelper(f)));
    }

    /// Look up a helper by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Helper>> {
        self.helpers.get(name).cloned()
    }

    /// Check whether a helper name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    /// Iterate over the registered helper names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.helpers.keys().map(|s| s.as_str())
    }
}

impl fmt::Debug for HelperRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("HelperRegistry")
            .field("helpers", &names)
            .finish()
    }
}

/// Create a registry pre-populated with the built-in helpers.
///
/// Built-ins:
/// - `get`: read a path (first argument) out of the accumulated value
/// - `default`: replace a null accumulator with the first argument
/// - `upper` / `lower`: change the case of a string accumulator
/// - `join`: join an array accumulator with a separator (first argument)
pub fn default_registry() -> HelperRegistry {
    let mut registry = HelperRegistry::new();

    registry.register_fn("get", |input, args| async move {
        let raw = match args.first() {
            Some(Value::String(s)) => s.clone(),
            _ => return Err("get expects a path string argument".into()),
        };
        let path = PathSpec::parse(&raw)?;
        Ok(path.get(&input).cloned().unwrap_or(Value::Null))
    });

    registry.register_fn("default", |input, args| async move {
        if input.is_null() {
            Ok(args.into_iter().next().unwrap_or(Value::Null))
        } else {
            Ok(input)
        }
    });

    registry.register_fn("upper", |input, _args| async move {
        let s = input.as_str().ok_or("upper expects a string input")?;
        Ok(Value::String(s.to_uppercase()))
    });

    registry.register_fn("lower", |input, _args| async move {
        let s = input.as_str().ok_or("lower expects a string input")?;
        Ok(Value::String(s.to_lowercase()))
    });

    registry.register_fn("join", |input, args| async move {
        let items = input.as_array().ok_or("join expects an array input")?;
        let separator = match args.first() {
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        };
        let parts: Vec<String> = items.iter().map(scalar_string).collect();
        Ok(Value::String(parts.join(&separator)))
    });

    registry
}

fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
