//! nginx configuration rendering.
//!
//! # Data Flow
//! ```text
//! AppConfig[] + GatewaySettings
//!     → template.rs (one upstream block per app, extraction order)
//!     → routing::priority (stable sort by priority)
//!     → location.rs (route blocks, then one catch-all)
//!     → template.rs (outer http/server template with timestamp)
//!     → String (written to disk by the caller)
//! ```
//!
//! # Design Decisions
//! - Rendering is pure; the timestamp is passed in so output is reproducible
//! - A route already claimed by a higher-precedence app is not emitted again,
//!   nginx rejects duplicate `location` blocks

pub mod location;
pub mod template;

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::schema::{AppConfig, GatewaySettings};
use crate::routing::priority::{select_default, sort_by_priority, RouteMatch};

pub use location::LocationBlock;
pub use template::UpstreamBlock;

/// Errors raised while emitting the rendered configuration.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Render all upstream blocks in extraction order.
pub fn render_upstreams(apps: &[AppConfig]) -> String {
    apps.iter()
        .map(|app| UpstreamBlock(app).to_string())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render route blocks in priority order followed by the catch-all block.
pub fn render_locations(apps: &[AppConfig], settings: &GatewaySettings) -> String {
    let sorted = sort_by_priority(apps);
    let mut claimed: HashSet<RouteMatch> = HashSet::new();
    let mut blocks: Vec<String> = Vec::new();

    for app in &sorted {
        for route in &app.routes {
            let route = RouteMatch::parse(route);
            if !claimed.insert(route.clone()) {
                tracing::warn!(
                    app = %app.name,
                    route = %route.path(),
                    "Route already served by a higher-priority app, skipping"
                );
                continue;
            }
            blocks.push(LocationBlock::route(app, route, settings.path_rewrite).to_string());
        }
    }

    if let Some(default_app) = select_default(&sorted) {
        tracing::debug!(app = %default_app.name, "Selected catch-all app");
        blocks.push(LocationBlock::catch_all(default_app).to_string());
    }

    blocks.join("\n")
}

/// Render the full configuration.
pub fn render_config(
    apps: &[AppConfig],
    settings: &GatewaySettings,
    generated_at: DateTime<Utc>,
) -> String {
    let upstreams = render_upstreams(apps);
    let locations = render_locations(apps, settings);
    template::wrap(settings, generated_at, &upstreams, &locations)
}

/// Write a rendered configuration to `path`.
pub fn write_config(path: &Path, content: &str) -> Result<(), RenderError> {
    std::fs::write(path, content).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), bytes = content.len(), "Configuration written");
    Ok(())
}
