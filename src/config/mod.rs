//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env file (KEY=value lines)
//!     → loader.rs (read from disk, ConfigNotFound on absence)
//!     → env.rs (parse lines into RawEnv)
//!     → apps.rs (group suffixed keys into AppConfig records)
//!     → schema.rs (GatewaySettings from global keys)
//!     → consumed by render (generation) or health (validation)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; each entry point re-reads the file
//! - All fields have defaults so a single `<NAME>_HOST` line is a valid config
//! - Parsing anomalies fall back to defaults instead of failing

pub mod apps;
pub mod env;
pub mod loader;
pub mod schema;

pub use apps::extract_apps;
pub use env::RawEnv;
pub use loader::{load_env_file, ConfigError};
pub use schema::{AppConfig, GatewaySettings, Protocol, WorkerProcesses};

/// Load an environment file and extract its applications and settings.
///
/// Fails with [`ConfigError::NoApplicationsFound`] when no record has a host.
pub fn load_gateway(
    path: &std::path::Path,
) -> Result<(Vec<AppConfig>, GatewaySettings), ConfigError> {
    let env = load_env_file(path)?;
    let apps = extract_apps(&env);
    if apps.is_empty() {
        return Err(ConfigError::NoApplicationsFound);
    }

    Ok((apps, GatewaySettings::from_env(&env)))
}
