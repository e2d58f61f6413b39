//! Application layer - orchestration of domain logic.
//!
//! This layer coordinates the domain types and owns the runtime state:
//! - Frame clock (shared tick counter)
//! - Throttle registry (per-subsystem emission history)
//! - Level filters (persisted enable flags)
//! - Line formatting and failure rendering
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters must implement. This keeps the application layer independent
//! from infrastructure details.

pub mod filter;
pub mod format;
pub mod frame_clock;
pub mod metrics;
pub mod ports;
pub mod registry;
