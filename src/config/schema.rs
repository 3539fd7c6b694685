//! Configuration schema definitions.
//!
//! Application records and gateway-wide settings derived from the environment
//! file. All types are plain data; derivation lives in `apps.rs` and
//! [`GatewaySettings::from_env`].

use std::fmt;
use std::str::FromStr;

use crate::config::env::{
    RawEnv, ENV_ENABLE_PATH_REWRITE, ENV_NGINX_PORT, ENV_SERVER_NAME, ENV_WORKER_CONNECTIONS,
    ENV_WORKER_PROCESSES,
};
use crate::routing::protocol::detect_protocol;

/// Priority assigned when `<NAME>_PRIORITY` is missing or not an integer.
pub const DEFAULT_PRIORITY: i64 = 999;

/// Upstream protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    /// Port used when the host carries none.
    pub fn default_port(&self) -> u16 {
        match self {
            Protocol::Http => 80,
            Protocol::Https => 443,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            other => Err(format!("unsupported protocol: {}", other)),
        }
    }
}

/// Routing configuration for one backend application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Shared key prefix, e.g. `API` for `API_HOST`.
    pub name: String,

    /// Backend address, `hostname[:port]`.
    pub host: String,

    /// Path prefixes served by this app. Empty means catch-all candidate.
    pub routes: Vec<String>,

    /// Lower value wins route conflicts.
    pub priority: i64,

    /// Protocol given explicitly via `<NAME>_PROTOCOL`.
    pub protocol: Option<Protocol>,
}

impl AppConfig {
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            routes: Vec::new(),
            priority: DEFAULT_PRIORITY,
            protocol: None,
        }
    }

    pub fn with_routes<I, S>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.routes = routes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    /// Explicit protocol if set, otherwise detected from the host.
    pub fn protocol(&self) -> Protocol {
        detect_protocol(&self.host, self.protocol)
    }

    /// True when this app has no routes and may serve as the catch-all.
    pub fn is_catch_all(&self) -> bool {
        self.routes.is_empty()
    }

    /// Upstream group name used in the generated configuration.
    pub fn upstream_name(&self) -> String {
        self.name.to_lowercase()
    }
}

/// nginx `worker_processes` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerProcesses {
    #[default]
    Auto,
    Count(u32),
}

impl fmt::Display for WorkerProcesses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerProcesses::Auto => f.write_str("auto"),
            WorkerProcesses::Count(n) => write!(f, "{}", n),
        }
    }
}

impl FromStr for WorkerProcesses {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            Ok(WorkerProcesses::Auto)
        } else {
            s.parse().map(WorkerProcesses::Count)
        }
    }
}

/// Gateway-wide settings for the generated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    /// `server_name` of the server block.
    pub server_name: String,

    /// Port nginx listens on.
    pub listen_port: u16,

    pub worker_processes: WorkerProcesses,

    /// Maximum simultaneous connections per worker.
    pub worker_connections: u32,

    /// Strip route prefixes before forwarding and restore them on redirects.
    pub path_rewrite: bool,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            server_name: "localhost".to_string(),
            listen_port: 80,
            worker_processes: WorkerProcesses::Auto,
            worker_connections: 1024,
            path_rewrite: false,
        }
    }
}

impl GatewaySettings {
    /// Read global keys, falling back to defaults for missing or invalid values.
    pub fn from_env(env: &RawEnv) -> Self {
        let defaults = Self::default();

        Self {
            server_name: env
                .get(ENV_SERVER_NAME)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .unwrap_or(defaults.server_name),
            listen_port: parse_or_default(env, ENV_NGINX_PORT, defaults.listen_port),
            worker_processes: parse_or_default(
                env,
                ENV_WORKER_PROCESSES,
                defaults.worker_processes,
            ),
            worker_connections: parse_or_default(
                env,
                ENV_WORKER_CONNECTIONS,
                defaults.worker_connections,
            ),
            path_rewrite: env.get(ENV_ENABLE_PATH_REWRITE) == Some("true"),
        }
    }
}

fn parse_or_default<T>(env: &RawEnv, key: &str, default: T) -> T
where
    T: FromStr + fmt::Display,
{
    match env.get(key).filter(|v| !v.is_empty()) {
        None => default,
        Some(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(key = %key, value = %raw, default = %default, "Invalid value, using default");
                default
            }
        },
    }
}
