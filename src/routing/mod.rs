//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! AppConfig[]
//!     → protocol.rs (resolve http/https, classify external hosts)
//!     → priority.rs (sort by priority, pick catch-all, normalize routes)
//!     → render (location blocks) / health (conflict report)
//! ```
//!
//! # Design Decisions
//! - No I/O: every function here is a pure computation over records
//! - Deterministic: same records always produce the same ordering
//! - Lower priority value wins conflicts

pub mod priority;
pub mod protocol;

pub use priority::{select_default, sort_by_priority, RouteMatch};
pub use protocol::{detect_protocol, is_external_domain};
