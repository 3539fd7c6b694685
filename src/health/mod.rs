//! Backend validation subsystem.
//!
//! # Data Flow
//! ```text
//! AppConfig[] (re-derived from the .env file)
//!     → validator.rs: host syntax check per app
//!     → probe.rs: one TCP connect per well-formed host (concurrent, bounded)
//!     → validator.rs: route conflicts + catch-all warnings
//!     → state.rs: per-app status and overall verdict
//! ```
//!
//! # Design Decisions
//! - A malformed host is an error, an unreachable host only a warning
//! - One app's failure never aborts the checks of the others
//! - Report order matches the order apps appear in the file

pub mod probe;
pub mod state;
pub mod validator;

pub use probe::{Probe, TcpProbe};
pub use state::{AppCheck, AppStatus, DefaultWarning, RouteConflict, ValidationStatus};
pub use validator::{ValidationReport, Validator, DEFAULT_PROBE_TIMEOUT};
