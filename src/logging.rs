use tracing_subscriber::EnvFilter;

use crate::LOG_FILTER_ENV;

/// Installs the fmt subscriber once; later calls are ignored.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log sink handed to components that take a `Fn(&str)` logger.
pub fn append_desktop_log(message: &str) {
    tracing::info!(target: "lora_desktop", "{message}");
}
