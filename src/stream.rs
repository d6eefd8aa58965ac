//! Stream rendering: one render pass per record of an input sequence.

use serde_json::Value;

use crate::engine::RenderEngine;
use crate::error::{RenderError, Stage};

/// Handlers for one stream session. All three slots are required; a missing
/// slot is a distinct configuration error reported before any record runs.
#[derive(Default)]
pub struct StreamOptions {
    on_item: Option<Box<dyn FnMut(Value) + Send>>,
    on_error: Option<Box<dyn FnMut(RenderError) + Send>>,
    on_finish: Option<Box<dyn FnOnce() + Send>>,
}

impl StreamOptions {
    /// Create stream options with no handlers set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the handler receiving each successfully rendered record.
    pub fn on_item(mut self, f: impl FnMut(Value) + Send + 'static) -> Self {
        self.on_item = Some(Box::new(f));
        self
    }

    /// Set the handler receiving each failed record's error.
    pub fn on_error(mut self, f: impl FnMut(RenderError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    /// Set the handler fired once after the whole sequence is processed.
    pub fn on_finish(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_finish = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for StreamOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamOptions")
            .field("on_item", &self.on_item.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_finish", &self.on_finish.is_some())
            .finish()
    }
}

impl RenderEngine {
    /// Render every record of `data` (a JSON array) in input order.
    ///
    /// Each record gets its own render pass over a fresh output container.
    /// A record's rendered value is moved into `on_item`; a record's error
    /// goes to `on_error` and the sequence continues with the next record.
    /// `on_finish` fires exactly once after the last record, then the call
    /// returns `Ok(())` — records were already delivered individually, so
    /// there is no aggregate value.
    ///
    /// Record *i* is fully rendered and delivered before record *i+1*
    /// starts, so `on_item` sees results in input order. Delivered values
    /// are owned and never aliased by the engine or by each other.
    pub async fn render_stream(
        &self,
        data: &Value,
        options: StreamOptions,
    ) -> Result<(), RenderError> {
        let records = data
            .as_array()
            .ok_or_else(|| configure_error("stream data is not an array"))?;

        let StreamOptions {
            on_item,
            on_error,
            on_finish,
        } = options;

        let mut on_item =
            on_item.ok_or_else(|| configure_error("stream options are missing the on_item handler"))?;
        let mut on_error = on_error
            .ok_or_else(|| configure_error("stream options are missing the on_error handler"))?;
        let on_finish = on_finish
            .ok_or_else(|| configure_error("stream options are missing the on_finish handler"))?;

        for record in records {
            match self.render(record).await {
                Ok(value) => on_item(value),
                Err(err) => on_error(err),
            }
        }

        on_finish();
        Ok(())
    }
}

fn configure_error(message: &str) -> RenderError {
    RenderError::new(
        Stage::Configure,
        "stream",
        std::io::Error::new(std::io::ErrorKind::InvalidInput, message.to_string()),
    )
}
