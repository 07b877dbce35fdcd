//! Opt-in log output for tests and benches.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG`, if it is set and parses.
///
/// Tests and benches call `zmq_nothrow::dev_tracing::init_tracing()` to see
/// socket lifecycle (`debug`) and per-message (`trace`) events. Output goes
/// through the test writer so `cargo test` captures it per test. A no-op
/// when `RUST_LOG` is unset or invalid, or a global subscriber already
/// exists.
pub fn init_tracing() {
    let Ok(filter) = EnvFilter::try_from_default_env() else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
