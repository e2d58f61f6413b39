//! Domain layer - pure logic with no I/O.
//!
//! This layer contains the core concepts of the throttled logger:
//! - Severity levels and their routing tables
//! - Throttle key composition
//! - Timing policies and per-key throttle state
//! - Subsystem identifiers
//!
//! All types in this layer are pure and easily testable.

pub mod key;
pub mod level;
pub mod subsystem;
pub mod timing;
