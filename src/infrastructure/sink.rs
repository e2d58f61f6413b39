//! Sink adapter that forwards formatted lines to `tracing`.

use crate::application::ports::Sink;

/// Target attached to every event emitted by [`TracingSink`].
pub const SINK_TARGET: &str = "throttled_log";

/// Sink that emits each line as a `tracing` event.
///
/// The default channel maps to `INFO`, the warning channel to `WARN` and the error
/// channel to `ERROR`. Lines are already formatted, so they are passed as the event
/// message unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Create a tracing sink.
    pub fn new() -> Self {
        Self
    }
}

impl Sink for TracingSink {
    fn write_info(&self, text: &str) {
        tracing::info!(target: SINK_TARGET, "{}", text);
    }

    fn write_warning(&self, text: &str) {
        tracing::warn!(target: SINK_TARGET, "{}", text);
    }

    fn write_error(&self, text: &str) {
        tracing::error!(target: SINK_TARGET, "{}", text);
    }
}
