pub mod builders;
pub mod fake_launcher;
pub mod fake_processes;

use std::sync::{Arc, Once};

use sitebuild::config::ConfigFile;
use sitebuild::exec::ProcessBackend;
use sitebuild::fs::FileSystem;
use sitebuild::tasks::{build_registry, TaskContext};
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Run a future with a 5-second timeout.
#[allow(dead_code)]
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}

/// Context with the real site tasks registered.
pub fn site_context(
    config: ConfigFile,
    fs: Arc<dyn FileSystem>,
    processes: Arc<dyn ProcessBackend>,
) -> TaskContext {
    let registry = build_registry(&config).expect("site registry should build");
    TaskContext::new(config, registry, fs, processes)
}
