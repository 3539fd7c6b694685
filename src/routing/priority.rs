//! Priority ordering and default-app selection.
//!
//! # Responsibilities
//! - Order apps by priority (lower value first, stable on ties)
//! - Pick the single catch-all app
//! - Normalize route strings into match rules
//!
//! # Design Decisions
//! - Ordering is derived on demand, never stored on the records
//! - Shared by the renderer and the validator so both agree on who wins

use crate::config::schema::AppConfig;

/// How a configured route matches request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteMatch {
    /// Request path must equal `/`.
    ExactRoot,
    /// Request path starts with `prefix` followed by `/`. The prefix has a
    /// leading slash and no trailing slash, e.g. `/api`.
    Prefix(String),
}

impl RouteMatch {
    /// Normalize a raw route: add a leading `/`; `/` alone is an exact match.
    pub fn parse(route: &str) -> Self {
        let route = route.trim();
        let with_slash = if route.starts_with('/') {
            route.to_string()
        } else {
            format!("/{}", route)
        };

        if with_slash == "/" {
            return RouteMatch::ExactRoot;
        }

        let prefix = with_slash.trim_end_matches('/');
        if prefix.is_empty() {
            RouteMatch::ExactRoot
        } else {
            RouteMatch::Prefix(prefix.to_string())
        }
    }

    /// The nginx `location` argument for this rule.
    pub fn location(&self) -> String {
        match self {
            RouteMatch::ExactRoot => "= /".to_string(),
            RouteMatch::Prefix(prefix) => format!("{}/", prefix),
        }
    }

    /// The route as users write it, e.g. `/api`.
    pub fn path(&self) -> &str {
        match self {
            RouteMatch::ExactRoot => "/",
            RouteMatch::Prefix(prefix) => prefix,
        }
    }
}

/// Apps sorted by ascending priority; ties keep their original order.
pub fn sort_by_priority(apps: &[AppConfig]) -> Vec<&AppConfig> {
    let mut sorted: Vec<&AppConfig> = apps.iter().collect();
    sorted.sort_by_key(|app| app.priority);
    sorted
}

/// Choose the catch-all app from a priority-sorted list.
///
/// The first app without routes wins; if every app has routes, the last one
/// (lowest precedence) becomes the default.
pub fn select_default<'a>(sorted: &[&'a AppConfig]) -> Option<&'a AppConfig> {
    sorted
        .iter()
        .find(|app| app.is_catch_all())
        .or_else(|| sorted.last())
        .copied()
}
