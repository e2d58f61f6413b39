//! Sink that records every line it receives.

use crate::application::ports::Sink;
use crate::domain::level::Channel;
use std::sync::{Arc, Mutex, PoisonError};

/// One line handed to a [`CaptureSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedLine {
    /// Channel the line was written to
    pub channel: Channel,
    /// Formatted line
    pub text: String,
}

/// Sink that keeps every written line in memory.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    lines: Arc<Mutex<Vec<CapturedLine>>>,
}

impl CaptureSink {
    /// Create an empty capture sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured lines, oldest first.
    pub fn lines(&self) -> Vec<CapturedLine> {
        self.buffer().clone()
    }

    /// Text of every captured line, oldest first.
    pub fn texts(&self) -> Vec<String> {
        self.buffer().iter().map(|line| line.text.clone()).collect()
    }

    /// Text of the lines written to `channel`.
    pub fn on_channel(&self, channel: Channel) -> Vec<String> {
        self.buffer()
            .iter()
            .filter(|line| line.channel == channel)
            .map(|line| line.text.clone())
            .collect()
    }

    /// Most recent line, if any.
    pub fn last(&self) -> Option<CapturedLine> {
        self.buffer().last().cloned()
    }

    /// Number of captured lines.
    pub fn count(&self) -> usize {
        self.buffer().len()
    }

    /// Forget all captured lines.
    pub fn clear(&self) {
        self.buffer().clear();
    }

    fn buffer(&self) -> std::sync::MutexGuard<'_, Vec<CapturedLine>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, channel: Channel, text: &str) {
        self.buffer().push(CapturedLine {
            channel,
            text: text.to_string(),
        });
    }
}

impl Sink for CaptureSink {
    fn write_info(&self, text: &str) {
        self.push(Channel::Info, text);
    }

    fn write_warning(&self, text: &str) {
        self.push(Channel::Warning, text);
    }

    fn write_error(&self, text: &str) {
        self.push(Channel::Error, text);
    }
}
