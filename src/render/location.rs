//! `location` block rendering.
//!
//! # Responsibilities
//! - Emit one nginx `location` block per route and one catch-all
//! - Apply path rewrite (strip prefix, restore it on redirects)
//! - Apply upstream TLS options and the outbound Host header

use std::fmt;

use crate::config::schema::{AppConfig, Protocol};
use crate::routing::priority::RouteMatch;
use crate::routing::protocol::{hostname_of, is_external_domain};

/// Directives shared by every proxied location.
const PROXY_TUNING: &[&str] = &[
    "proxy_buffers 16 512k;",
    "proxy_buffer_size 512k;",
    "proxy_busy_buffers_size 512k;",
    "proxy_read_timeout 120s;",
    "proxy_send_timeout 120s;",
];

const TLS_PROTOCOLS: &str = "TLSv1.2 TLSv1.3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationKind {
    /// An explicit route of the app.
    Route(RouteMatch),
    /// The `location /` fallback.
    CatchAll,
}

/// A renderable `location` block for one app.
#[derive(Debug, Clone)]
pub struct LocationBlock<'a> {
    app: &'a AppConfig,
    kind: LocationKind,
    path_rewrite: bool,
}

impl<'a> LocationBlock<'a> {
    pub fn route(app: &'a AppConfig, route: RouteMatch, path_rewrite: bool) -> Self {
        Self {
            app,
            kind: LocationKind::Route(route),
            path_rewrite,
        }
    }

    pub fn catch_all(app: &'a AppConfig) -> Self {
        Self {
            app,
            kind: LocationKind::CatchAll,
            path_rewrite: false,
        }
    }

    /// Prefix stripped before forwarding, if rewriting applies to this block.
    fn stripped_prefix(&self) -> Option<&str> {
        match &self.kind {
            LocationKind::Route(RouteMatch::Prefix(prefix)) if self.path_rewrite => Some(prefix.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for LocationBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let app = self.app;
        let protocol = app.protocol();
        let upstream = app.upstream_name();
        let hostname = hostname_of(&app.host);

        writeln!(f)?;
        match &self.kind {
            LocationKind::Route(route) => {
                writeln!(f, "        # {} - {}", app.name, route.path())?;
                writeln!(f, "        location {} {{", route.location())?;
            }
            LocationKind::CatchAll => {
                writeln!(f, "        # Default catch-all ({})", app.name)?;
                writeln!(f, "        location / {{")?;
            }
        }

        if let Some(prefix) = self.stripped_prefix() {
            writeln!(f, "            # Strip base path ({})", prefix)?;
            writeln!(f, "            rewrite ^{}(/|$)(.*) /$2 break;", prefix)?;
            writeln!(f)?;
        }

        writeln!(f, "            proxy_pass {}://{};", protocol, upstream)?;

        if let Some(prefix) = self.stripped_prefix() {
            writeln!(f)?;
            writeln!(f, "            # Restore base path on redirects")?;
            writeln!(
                f,
                "            proxy_redirect ~^(https?://[^/]+)(/.*)?$ $1{}$2;",
                prefix
            )?;
            writeln!(f, "            proxy_redirect / {}/;", prefix)?;
            writeln!(f)?;
        }

        if is_external_domain(&app.host) {
            writeln!(f, "            proxy_set_header Host {};", hostname)?;
        } else {
            writeln!(f, "            proxy_set_header Host $host;")?;
        }
        writeln!(f, "            proxy_set_header X-Real-IP $remote_addr;")?;
        writeln!(
            f,
            "            proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;"
        )?;
        writeln!(f, "            proxy_set_header X-Forwarded-Proto $scheme;")?;

        if let Some(prefix) = self.stripped_prefix() {
            writeln!(f, "            proxy_set_header X-Forwarded-Prefix {};", prefix)?;
            writeln!(f, "            proxy_set_header X-Script-Name {};", prefix)?;
        }

        if protocol == Protocol::Https {
            writeln!(f)?;
            writeln!(f, "            # Upstream TLS")?;
            writeln!(f, "            proxy_ssl_server_name on;")?;
            writeln!(f, "            proxy_ssl_name {};", hostname)?;
            writeln!(f, "            proxy_ssl_protocols {};", TLS_PROTOCOLS)?;
            writeln!(f, "            proxy_ssl_verify off;")?;
        }

        writeln!(f)?;
        for directive in PROXY_TUNING {
            writeln!(f, "            {}", directive)?;
        }
        write!(f, "        }}")
    }
}
