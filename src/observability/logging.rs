//! Structured logging.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `default_directive` when set. Calling this twice is
/// harmless; the second call is ignored.
pub fn init_logging(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Default filter for a plain log level such as `info` or `debug`.
pub fn default_directive(level: &str) -> String {
    format!("online_server_count={level},tower_http=info")
}
