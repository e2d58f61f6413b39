//! Infrastructure layer - adapters for the application ports.
//!
//! This layer provides:
//! - Clock abstraction (system time vs mock)
//! - Storage implementations (sharded maps)
//! - Settings stores (in-memory, JSON file)
//! - The `tracing` sink
//! - The log facade, wiring these defaults into the application layer

pub mod clock;
pub mod facade;
pub mod settings;
pub mod sink;
pub mod storage;

/// Mock implementations for testing.
///
/// Only available with the `test-helpers` feature or in test builds. To use the
/// mocks in integration tests, add to your `Cargo.toml`:
/// ```toml
/// [dev-dependencies]
/// throttled-log = { version = "*", features = ["test-helpers"] }
/// ```
#[cfg(any(test, feature = "test-helpers"))]
pub mod mocks;
