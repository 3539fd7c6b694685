//! Structured logging.
//!
//! # Responsibilities
//! - Install the global tracing subscriber for both binaries
//! - Keep diagnostics on stderr so stdout carries only the report
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the default filter
//! - Default is `info` for this crate, `warn` for everything else

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "warn,nginx_gateway=info";

/// Initialize the tracing subscriber. Safe to call once per process.
pub fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
