//! Throttle key composition.
//!
//! A throttle key identifies one class of repeated messages inside a subsystem. It is
//! built from the level, the scope label, and either the caller's explicit dedupe key or
//! the raw message text. Keys keep the three parts separate, so `("a|b", "c")` and
//! `("a", "b|c")` can never compare equal the way a joined string could.

use crate::domain::level::Level;
use std::fmt;

/// Identity under which repeat suppression is tracked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThrottleKey {
    level: Level,
    scope: Box<str>,
    text: Box<str>,
}

impl ThrottleKey {
    /// Compose a key.
    ///
    /// A missing or blank `dedupe_key` falls back to `message`. A missing scope and an
    /// empty scope produce the same key.
    pub fn new(level: Level, scope: Option<&str>, message: &str, dedupe_key: Option<&str>) -> Self {
        let text = match dedupe_key {
            Some(key) if !key.trim().is_empty() => key,
            _ => message,
        };

        Self {
            level,
            scope: scope.unwrap_or_default().into(),
            text: text.into(),
        }
    }

    /// Level part of the key.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Scope part of the key (empty when no scope was given).
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Dedupe text: the explicit key, or the message when none was given.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for ThrottleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.level, self.scope, self.text)
    }
}
