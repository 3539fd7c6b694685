//! Fixed outer nginx template and upstream blocks.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::schema::{AppConfig, GatewaySettings};
use crate::routing::protocol::explicit_port;

/// `upstream` block for one app.
pub struct UpstreamBlock<'a>(pub &'a AppConfig);

impl UpstreamBlock<'_> {
    /// Backend address with the protocol's default port appended if missing.
    pub fn server_address(&self) -> String {
        let app = self.0;
        if explicit_port(&app.host).is_some() {
            app.host.clone()
        } else {
            format!("{}:{}", app.host, app.protocol().default_port())
        }
    }
}

impl fmt::Display for UpstreamBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "    # {}", self.0.name)?;
        writeln!(f, "    upstream {} {{", self.0.upstream_name())?;
        writeln!(f, "        server {};", self.server_address())?;
        write!(f, "    }}")
    }
}

/// Wrap rendered upstreams and locations in the top-level configuration.
pub fn wrap(
    settings: &GatewaySettings,
    generated_at: DateTime<Utc>,
    upstreams: &str,
    locations: &str,
) -> String {
    format!(
        r#"# Auto-generated nginx configuration
# Generated at: {generated_at}
# DO NOT EDIT THIS FILE MANUALLY - edit .env instead and regenerate

user nginx;
worker_processes {worker_processes};

error_log /var/log/nginx/error.log notice;
pid /var/run/nginx.pid;

events {{
    worker_connections {worker_connections};
}}

http {{
    include /etc/nginx/mime.types;
    default_type application/octet-stream;

    log_format main '$remote_addr - $remote_user [$time_local] "$request" '
                    '$status $body_bytes_sent "$http_referer" '
                    '"$http_user_agent" "$http_x_forwarded_for"';

    access_log /var/log/nginx/access.log main;

    sendfile on;
    keepalive_timeout 65;

    # Global proxy settings
    proxy_http_version 1.1;
    proxy_set_header Upgrade $http_upgrade;
    proxy_set_header Connection 'upgrade';
    proxy_cache_bypass $http_upgrade;

{upstreams}

    server {{
        listen {listen_port};
        server_name {server_name};
{locations}
    }}
}}
"#,
        generated_at = generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        worker_processes = settings.worker_processes,
        worker_connections = settings.worker_connections,
        upstreams = upstreams,
        listen_port = settings.listen_port,
        server_name = settings.server_name,
        locations = locations,
    )
}
