pub mod fake_launcher;
pub mod recorder;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use procpool::logging::{env_filter, LOG_ENV};
use tracing_subscriber::fmt;

pub use fake_launcher::{bind_fake, FakeLauncher, FakeProcesses};
pub use recorder::EventRecorder;

static INIT: Once = Once::new();

/// Upper bound for a single async test.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Initialise tracing for tests, once per test binary.
///
/// Output goes through the test writer, so it only shows for failing tests
/// (or with `--nocapture`). Filtering uses the same `PROCPOOL_LOG` directives
/// as the daemon, e.g. `PROCPOOL_LOG=procpool::engine=debug cargo test`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let env = std::env::var(LOG_ENV).ok();
        fmt()
            .with_env_filter(env_filter(None, env.as_deref()))
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Run a future, failing the test if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(out) => out,
        Err(_) => panic!("test did not finish within {TEST_TIMEOUT:?}"),
    }
}
