//! Line formatting and failure rendering.

use crate::domain::level::Level;
use std::error::Error;
use std::fmt::Write as _;

/// Build the line handed to the sink.
///
/// The scope segment is left out when `scope` is absent or blank.
///
/// ```
/// use throttled_log::{format_line, Level};
///
/// assert_eq!(format_line(Level::Warning, "slow", Some("Net")), "[WARNING] [Net] slow");
/// assert_eq!(format_line(Level::Info, "ready", Some("  ")), "[INFO] ready");
/// ```
pub fn format_line(level: Level, message: &str, scope: Option<&str>) -> String {
    match scope.filter(|s| !is_blank(s)) {
        Some(scope) => format!("{} [{}] {}", level.tag(), scope, message),
        None => format!("{} {}", level.tag(), message),
    }
}

/// Render a failure with its type, message, debug detail and cause chain.
///
/// The first line is `"{type}: {message}"`. The type is only known statically, so
/// for trait objects (`&dyn Error`, `Box<dyn Error>`) it would name the trait rather
/// than the concrete failure; the prefix is left out then and the line is just the
/// message. The `Debug` form follows, then one `caused by:` line per source.
///
/// ```
/// use std::error::Error;
/// use throttled_log::render_failure;
///
/// let err: Box<dyn Error> = "disk full".into();
/// assert!(render_failure(err.as_ref()).starts_with("disk full\n"));
/// ```
pub fn render_failure<E>(error: &E) -> String
where
    E: Error + ?Sized,
{
    let type_name = std::any::type_name::<E>();
    let mut text = if type_name.starts_with("dyn ") {
        error.to_string()
    } else {
        format!("{}: {}", type_name, error)
    };
    let _ = write!(text, "\n{:?}", error);

    let mut source = error.source();
    while let Some(cause) = source {
        let _ = write!(text, "\ncaused by: {}", cause);
        source = cause.source();
    }
    text
}

pub(crate) fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Timeout;

    impl fmt::Display for Timeout {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "timed out")
        }
    }

    impl Error for Timeout {}

    #[derive(Debug)]
    struct Handshake(Timeout);

    impl fmt::Display for Handshake {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "handshake failed")
        }
    }

    impl Error for Handshake {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_format_line() {
        assert_eq!(format_line(Level::Info, "up", None), "[INFO] up");
        assert_eq!(format_line(Level::Error, "down", Some("Net")), "[ERROR] [Net] down");
        assert_eq!(format_line(Level::Trace, "x", Some("")), "[TRACE] x");
    }

    #[test]
    fn test_render_concrete_failure() {
        let text = render_failure(&Handshake(Timeout));
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].ends_with("Handshake: handshake failed"));
        assert_eq!(lines[1], "Handshake(Timeout)");
        assert_eq!(lines[2], "caused by: timed out");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_render_trait_object_has_no_type_prefix() {
        let boxed: Box<dyn Error> = Box::new(Handshake(Timeout));
        let text = render_failure(boxed.as_ref());

        assert!(text.starts_with("handshake failed\n"));
        assert!(!text.contains("dyn "));
        assert!(text.contains("Handshake(Timeout)"));
        assert!(text.ends_with("caused by: timed out"));

        let shared: &(dyn Error + Send + Sync) = &Timeout;
        assert_eq!(render_failure(shared), "timed out\nTimeout");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" \t\n"));
        assert!(!is_blank(" x "));
    }
}
