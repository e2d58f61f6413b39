//! Severity levels and their fixed routing tables.
//!
//! Every level maps to a printable tag, a sink channel, and (for levels that can be
//! switched off) the name of its persisted enable flag. The mappings are plain `match`
//! tables so lookups never allocate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Importance of a log message, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    /// Fine-grained tracing output
    Trace,
    /// Debugging output
    Debug,
    /// Chatty informational output
    Verbose,
    /// Regular informational output
    Info,
    /// Something looks wrong but work continues
    Warning,
    /// An operation failed
    Error,
    /// A failure that threatens the host
    Critical,
    /// A captured failure rendered with full detail
    Exception,
}

/// Destination channel on the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Default output
    Info,
    /// Warning output
    Warning,
    /// Error output
    Error,
}

/// Number of levels that can be toggled.
pub const FLAG_COUNT: usize = 5;

/// Levels that can be toggled, in flag-table order.
pub const SWITCHABLE_LEVELS: [Level; FLAG_COUNT] = [
    Level::Trace,
    Level::Debug,
    Level::Verbose,
    Level::Info,
    Level::Warning,
];

impl Level {
    /// All levels, least severe first.
    pub const ALL: [Level; 8] = [
        Level::Trace,
        Level::Debug,
        Level::Verbose,
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Critical,
        Level::Exception,
    ];

    /// Bracketed prefix written in front of every formatted line.
    pub fn tag(self) -> &'static str {
        match self {
            Level::Trace => "[TRACE]",
            Level::Debug => "[DEBUG]",
            Level::Verbose => "[VERBOSE]",
            Level::Info => "[INFO]",
            Level::Warning => "[WARNING]",
            Level::Error => "[ERROR]",
            Level::Critical => "[CRITICAL]",
            Level::Exception => "[EXCEPTION]",
        }
    }

    /// Short uppercase name, also used when composing throttle keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Verbose => "VERBOSE",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
            Level::Exception => "EXCEPTION",
        }
    }

    /// Sink channel this level is routed to.
    pub fn channel(self) -> Channel {
        match self {
            Level::Warning => Channel::Warning,
            Level::Error | Level::Critical | Level::Exception => Channel::Error,
            Level::Trace | Level::Debug | Level::Verbose | Level::Info => Channel::Info,
        }
    }

    /// Failures are never filtered out.
    pub fn is_always_enabled(self) -> bool {
        matches!(self, Level::Error | Level::Critical | Level::Exception)
    }

    /// Position in the flag table, or `None` for always-enabled levels.
    pub fn flag_index(self) -> Option<usize> {
        match self {
            Level::Trace => Some(0),
            Level::Debug => Some(1),
            Level::Verbose => Some(2),
            Level::Info => Some(3),
            Level::Warning => Some(4),
            Level::Error | Level::Critical | Level::Exception => None,
        }
    }

    /// Persisted flag name and its out-of-the-box value.
    pub fn flag(self) -> Option<(&'static str, bool)> {
        match self {
            Level::Trace => Some(("Enable Trace", false)),
            Level::Debug => Some(("Enable Debug", false)),
            Level::Verbose => Some(("Enable Verbose", false)),
            Level::Info => Some(("Enable Info", true)),
            Level::Warning => Some(("Enable Warning", true)),
            Level::Error | Level::Critical | Level::Exception => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
