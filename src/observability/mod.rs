//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config / render / health
//!     → tracing macros (structured fields: app, route, target, path)
//!     → logging.rs subscriber → stderr
//! ```

pub mod logging;

pub use logging::init_logging;
