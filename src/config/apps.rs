//! Application record extraction.
//!
//! # Responsibilities
//! - Group `<NAME>_HOST`, `<NAME>_ROUTES`, `<NAME>_PRIORITY`, `<NAME>_PROTOCOL`
//!   keys into one [`AppConfig`] per name
//! - Apply defaults (no routes, priority 999, detected protocol)
//! - Drop records that never received a host
//!
//! # Design Decisions
//! - Suffixed keys may appear in any order; a builder per name accumulates fields
//! - Output order is the first-seen order of each name, not priority order

use std::collections::HashMap;

use crate::config::env::RawEnv;
use crate::config::schema::{AppConfig, Protocol, DEFAULT_PRIORITY};

/// Key suffixes recognized per application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppKey {
    Host,
    Routes,
    Priority,
    Protocol,
}

impl AppKey {
    const ALL: [(AppKey, &'static str); 4] = [
        (AppKey::Host, "_HOST"),
        (AppKey::Routes, "_ROUTES"),
        (AppKey::Priority, "_PRIORITY"),
        (AppKey::Protocol, "_PROTOCOL"),
    ];

    /// Split `key` into `(name, suffix kind)` if it carries a known suffix
    /// after a non-empty name.
    fn classify(key: &str) -> Option<(&str, AppKey)> {
        Self::ALL.iter().find_map(|(kind, suffix)| {
            key.strip_suffix(*suffix)
                .filter(|name| !name.is_empty())
                .map(|name| (name, *kind))
        })
    }
}

#[derive(Debug, Default)]
struct AppBuilder {
    host: Option<String>,
    routes: Vec<String>,
    priority: Option<i64>,
    protocol: Option<Protocol>,
}

impl AppBuilder {
    fn build(self, name: String) -> Option<AppConfig> {
        let host = self.host.filter(|h| !h.is_empty())?;
        Some(AppConfig {
            name,
            host,
            routes: self.routes,
            priority: self.priority.unwrap_or(DEFAULT_PRIORITY),
            protocol: self.protocol,
        })
    }
}

/// Split a comma-separated route list, trimming and dropping empty entries.
pub fn parse_routes(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a priority value, `None` when it is not an integer.
pub fn try_parse_priority(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// Parse a priority value. Anything that is not an integer yields 999.
pub fn parse_priority(value: &str) -> i64 {
    try_parse_priority(value).unwrap_or(DEFAULT_PRIORITY)
}

/// Extract application records from a parsed environment.
pub fn extract_apps(env: &RawEnv) -> Vec<AppConfig> {
    let mut order: Vec<String> = Vec::new();
    let mut builders: HashMap<String, AppBuilder> = HashMap::new();

    for (key, value) in env.iter() {
        let Some((name, kind)) = AppKey::classify(key) else {
            continue;
        };

        let builder = builders.entry(name.to_string()).or_insert_with(|| {
            order.push(name.to_string());
            AppBuilder::default()
        });

        match kind {
            AppKey::Host => builder.host = Some(value.to_string()),
            AppKey::Routes => builder.routes = parse_routes(value),
            AppKey::Priority => {
                let priority = try_parse_priority(value).unwrap_or_else(|| {
                    tracing::warn!(app = %name, value = %value, "Invalid priority, using default");
                    DEFAULT_PRIORITY
                });
                builder.priority = Some(priority);
            }
            AppKey::Protocol => match value.parse::<Protocol>() {
                Ok(protocol) => builder.protocol = Some(protocol),
                Err(e) => {
                    tracing::warn!(app = %name, error = %e, "Ignoring protocol, falling back to detection");
                }
            },
        }

        tracing::debug!(app = %name, key = %key, "Matched application key");
    }

    order
        .into_iter()
        .filter_map(|name| {
            let builder = builders.remove(&name)?;
            let app = builder.build(name.clone());
            if app.is_none() {
                tracing::warn!(app = %name, "Dropping application without host");
            }
            app
        })
        .collect()
}
