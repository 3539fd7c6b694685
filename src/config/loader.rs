//! Environment file loading from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::env::RawEnv;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The environment file does not exist.
    #[error("environment file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// The environment file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file parsed, but no application declared a host.
    #[error("no application with a <NAME>_HOST entry found")]
    NoApplicationsFound,
}

/// Load and parse an environment file.
pub fn load_env_file(path: &Path) -> Result<RawEnv, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let env = RawEnv::parse(&content);
    tracing::info!(path = %path.display(), keys = env.len(), "Environment file loaded");

    Ok(env)
}
