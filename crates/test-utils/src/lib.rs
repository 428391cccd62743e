pub mod builders;
pub mod fake_launcher;

use std::sync::Once;

use cyclesched::logging::LOG_ENV_VAR;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Install a test subscriber once per test binary.
///
/// Reads the same filter variable as the scheduler binary, so
/// `CYCLESCHED_LOG=cyclesched::manager=debug cargo test --test manager`
/// shows the manager's negotiation and GC decisions. Output goes through the
/// test writer and only appears for failing tests or under `--nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Fail the test if the runtime has not shut down within five seconds.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("runtime did not stop within 5 seconds")
}
