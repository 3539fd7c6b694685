//! Key-value environment file parsing.
//!
//! # Responsibilities
//! - Turn `KEY=value` text into a flat [`RawEnv`]
//! - Skip blank lines and `#` comments
//! - Keep the first-seen position of every key so downstream output is stable
//!
//! # Design Decisions
//! - Values are taken verbatim after trimming (no quote stripping, no expansion)
//! - Only the first `=` separates key from value
//! - A repeated key overwrites the value in place

use std::collections::HashMap;

/// Global key: `server_name` of the generated server block.
pub const ENV_SERVER_NAME: &str = "SERVER_NAME";
/// Global key: port nginx listens on.
pub const ENV_NGINX_PORT: &str = "NGINX_PORT";
/// Global key: nginx `worker_processes`.
pub const ENV_WORKER_PROCESSES: &str = "WORKER_PROCESSES";
/// Global key: nginx `worker_connections`.
pub const ENV_WORKER_CONNECTIONS: &str = "WORKER_CONNECTIONS";
/// Global key: strip route prefixes before forwarding (`true` to enable).
pub const ENV_ENABLE_PATH_REWRITE: &str = "ENABLE_PATH_REWRITE";

/// Flat mapping of keys to values, iterated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEnv {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl RawEnv {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse environment text.
    pub fn parse(content: &str) -> Self {
        let mut env = Self::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                tracing::debug!(line = %line, "Ignoring line without '='");
                continue;
            };

            let key = key.trim();
            if key.is_empty() {
                continue;
            }

            env.insert(key, value.trim());
        }

        env
    }

    /// Insert or overwrite a value. Overwrites keep the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    /// Iterate `(key, value)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Self::new();
        for (key, value) in iter {
            env.insert(key, value);
        }
        env
    }
}
