//! Basic example demonstrating per-subsystem throttling.
//!
//! Runs a short simulated game loop: one subsystem throttles by wall-clock time,
//! another by frame count, and a scoped logger shows how scopes split throttle keys.

use std::sync::Arc;
use std::time::Duration;
use throttled_log::{Level, LogFacade, TimingMode};

fn main() {
    // The default sink forwards lines to `tracing`
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    let facade = Arc::new(LogFacade::new());
    let net = facade.logger("Net").expect("valid subsystem id");
    let physics = facade.logger("Physics").expect("valid subsystem id");

    println!("=== Basic Throttling Example ===\n");

    // Net: wall-clock throttling, at most one line per 100 ms per message
    net.set_wall_interval(0.1);
    // Physics: frame throttling, at most one line per 20 frames per message
    physics.set_timing_mode(TimingMode::Frame);
    physics.set_frame_interval(20);
    physics
        .set_level_enabled(Level::Debug, true)
        .expect("in-memory settings never fail");

    net.info("simulation starting");

    println!("Running 60 frames at ~100 fps:");
    for frame in 0..60 {
        facade.advance_frame();

        net.warning_throttled(&format!("latency spike on frame {}", frame), Some("latency"));
        physics.log_throttled(Level::Debug, "solver hit iteration cap", None, None);

        let socket = net.scoped("Socket");
        socket.info_throttled("retrying send", None);
        net.scoped("Dns").info_throttled("retrying send", None);

        std::thread::sleep(Duration::from_millis(10));
    }

    // Failures bypass level filters but still get rendered in full
    let failure = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "peer went away");
    net.exception(&failure, Some("Socket"));

    let snapshot = facade.metrics().snapshot();
    println!("\n=== Example Complete ===");
    println!("Lines written: {}", snapshot.lines_written);
    println!("Throttled:     {}", snapshot.throttled);
    println!("Throttle rate: {:.1}%", snapshot.throttle_rate() * 100.0);
}
