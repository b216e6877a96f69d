use std::sync::Once;

static INIT: Once = Once::new();

/// Install the global tracing subscriber. Output goes to stderr, filtered by
/// `RUST_LOG` with `smart_ledger=info` as the default.
pub fn init() {
    INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("smart_ledger=info"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}
