//! Upstream protocol detection.
//!
//! # Responsibilities
//! - Classify a backend host as IP, local, or external domain
//! - Pick `http`/`https` when no protocol is configured
//!
//! # Design Decisions
//! - Pure functions over `&str`; no DNS or network access
//! - Best-effort heuristic: an explicit `<NAME>_PROTOCOL` always wins,
//!   then a `:443`/`:80` port, then the external-domain classification

use std::sync::LazyLock;

use regex::Regex;

use crate::config::schema::Protocol;

static IPV4_LEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+\.\d+").expect("valid IPv4 pattern"));

static LOCAL_LEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(localhost|127\.0\.0\.1|host\.docker\.internal)").expect("valid local pattern")
});

static PORT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":(\d+)$").expect("valid port pattern"));

/// True if the host starts with a dotted IPv4 address.
pub fn is_ip_address(host: &str) -> bool {
    IPV4_LEADING.is_match(host)
}

/// True for loopback and docker-internal hosts.
pub fn is_local_host(host: &str) -> bool {
    LOCAL_LEADING.is_match(host)
}

/// True for hosts that look like public domain names.
pub fn is_external_domain(host: &str) -> bool {
    !is_ip_address(host) && !is_local_host(host)
}

/// Port written explicitly at the end of the host, if any.
pub fn explicit_port(host: &str) -> Option<u16> {
    PORT_SUFFIX
        .captures(host)
        .and_then(|caps| caps[1].parse().ok())
}

/// Host without its `:port` suffix.
pub fn hostname_of(host: &str) -> &str {
    match PORT_SUFFIX.find(host) {
        Some(m) => &host[..m.start()],
        None => host,
    }
}

/// Resolve the protocol for a backend.
pub fn detect_protocol(host: &str, explicit: Option<Protocol>) -> Protocol {
    if let Some(protocol) = explicit {
        return protocol;
    }

    match explicit_port(host) {
        Some(443) => return Protocol::Https,
        Some(80) => return Protocol::Http,
        _ => {}
    }

    if is_external_domain(host) {
        Protocol::Https
    } else {
        Protocol::Http
    }
}
