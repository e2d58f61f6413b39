//! Test doubles for the clock and sink ports.
//!
//! Lets tests drive time by hand and inspect exactly which lines reached the sink.

pub mod clock;
pub mod sink;

pub use clock::MockClock;
pub use sink::{CaptureSink, CapturedLine};
