//! Shared test setup

use std::sync::Once;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

static TEST_SETUP: Once = Once::new();

/// Route tracing output through the test harness, once per test binary.
///
/// Honors `RUST_LOG`; defaults to `loantree=debug`.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("loantree=debug"));
        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_span_events(FmtSpan::CLOSE)
            .try_init();
        if installed.is_ok() {
            tracing::debug!("test logging ready");
        }
    });
}
