//! Tracing subscriber setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingSection;

/// Install the global subscriber. `RUST_LOG` wins over `logging.level`.
pub fn init(cfg: &LoggingSection) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level));
    let registry = tracing_subscriber::registry().with(filter);

    match cfg.format.as_str() {
        "json" => registry.with(fmt::layer().json().with_target(true)).init(),
        _ => registry.with(fmt::layer().with_target(true)).init(),
    }
}
