//! nginx gateway configuration generator and environment validator.

pub mod config;
pub mod health;
pub mod observability;
pub mod render;
pub mod routing;

pub use config::{AppConfig, GatewaySettings};
pub use health::{ValidationReport, Validator};
