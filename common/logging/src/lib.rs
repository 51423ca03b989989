use tracing_subscriber::EnvFilter;

/// Return a tracing subscriber suitable for test usage.
///
/// By default no logs will be printed, but they can be enabled via
/// the `test_logger` feature.  This feature can be enabled for any
/// dependent crate by passing `--features logging/test_logger`, e.g.
/// ```bash
/// cargo test -p operation_pool --features logging/test_logger
/// ```
///
/// The filter defaults to `debug` and can be overridden with `RUST_LOG`.
pub fn create_test_tracing_subscriber() {
    if cfg!(feature = "test_logger") {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("debug"))
            .unwrap_or_default();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }
}
