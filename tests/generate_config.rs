//! End-to-end generation tests: .env file in, nginx configuration out.

use chrono::{DateTime, Utc};
use nginx_gateway::config::{load_gateway, ConfigError, Protocol};
use nginx_gateway::render::render_config;

mod common;

const ENV: &str = r#"
# Gateway
SERVER_NAME=gateway.example.com
NGINX_PORT=8080
ENABLE_PATH_REWRITE=true

# Main site, catch-all
WEB_HOST=192.168.1.10:3000
WEB_PRIORITY=10

# API behind two prefixes
API_ROUTES=/api, v1 ,
API_HOST=192.168.1.11:4000
API_PRIORITY=5

# Public service
DOCS_HOST=docs.example.org
DOCS_ROUTES=/docs
DOCS_PRIORITY=oops

# Incomplete entry, dropped
GHOST_ROUTES=/ghost
"#;

fn fixed_time(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

#[test]
fn test_full_generation() {
    let file = common::write_env(ENV);
    let (apps, settings) = load_gateway(file.path()).unwrap();

    let names: Vec<_> = apps.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["WEB", "API", "DOCS"]);
    assert_eq!(apps[1].routes, vec!["/api", "v1"]);
    assert_eq!(apps[2].priority, 999);
    assert_eq!(apps[2].protocol(), Protocol::Https);

    let text = render_config(&apps, &settings, fixed_time("2024-01-01T00:00:00Z"));

    assert!(text.contains("listen 8080;"));
    assert!(text.contains("server_name gateway.example.com;"));
    assert!(text.contains("upstream web {\n        server 192.168.1.10:3000;"));
    assert!(text.contains("upstream docs {\n        server docs.example.org:443;"));
    assert!(text.contains("location /api/ {"));
    assert!(text.contains("location /v1/ {"));
    assert!(text.contains("rewrite ^/v1(/|$)(.*) /$2 break;"));
    assert!(text.contains("proxy_pass https://docs;"));
    assert!(text.contains("proxy_set_header Host docs.example.org;"));
    assert!(text.contains("# Default catch-all (WEB)"));
    assert!(!text.contains("ghost"));

    let api = text.find("location /api/ {").unwrap();
    let docs = text.find("location /docs/ {").unwrap();
    assert!(api < docs);
}

#[test]
fn test_renders_differ_only_in_timestamp() {
    let file = common::write_env(ENV);
    let (apps, settings) = load_gateway(file.path()).unwrap();

    let first = render_config(&apps, &settings, fixed_time("2024-01-01T00:00:00Z"));
    let second = render_config(&apps, &settings, fixed_time("2025-06-30T23:59:59Z"));
    assert_ne!(first, second);

    let strip = |s: &str| -> Vec<String> {
        s.lines()
            .filter(|l| !l.starts_with("# Generated at:"))
            .map(str::to_string)
            .collect()
    };
    assert_eq!(strip(&first), strip(&second));
}

#[test]
fn test_all_routed_apps_fall_back_to_last() {
    let file = common::write_env(
        "A_HOST=10.0.0.1:80\nA_ROUTES=/a\nA_PRIORITY=1\nB_HOST=10.0.0.2:80\nB_ROUTES=/\nB_PRIORITY=2\n",
    );
    let (apps, settings) = load_gateway(file.path()).unwrap();
    let text = render_config(&apps, &settings, Utc::now());

    assert!(text.contains("location = / {"));
    assert!(text.contains("# Default catch-all (B)"));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_gateway(&dir.path().join(".env"));
    assert!(matches!(result, Err(ConfigError::ConfigNotFound { .. })));
}

#[test]
fn test_no_applications() {
    let file = common::write_env("SERVER_NAME=x\nORPHAN_ROUTES=/a\n");
    let result = load_gateway(file.path());
    assert!(matches!(result, Err(ConfigError::NoApplicationsFound)));
}
