//! Environment validation: host syntax, reachability, route conflicts.
//!
//! # Responsibilities
//! - Reject hosts that are not `hostname:port`
//! - Probe every well-formed host once, concurrently
//! - Report which app wins each shared route
//! - Warn when the catch-all app is missing or ambiguous

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

use futures_util::future::join_all;
use regex::Regex;
use serde::Serialize;

use crate::config::schema::AppConfig;
use crate::health::probe::Probe;
use crate::health::state::{AppCheck, AppStatus, DefaultWarning, RouteConflict, ValidationStatus};
use crate::routing::priority::{select_default, sort_by_priority, RouteMatch};

/// Default per-probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(3000);

static HOST_PORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+):(\d+)$").expect("valid host:port pattern"));

/// Split `hostname:port`. Returns `None` when either part is missing or the
/// port does not fit in a `u16`.
pub fn parse_host_port(host: &str) -> Option<(&str, u16)> {
    let caps = HOST_PORT.captures(host)?;
    let hostname = caps.get(1)?.as_str();
    let port = caps.get(2)?.as_str().parse().ok()?;
    Some((hostname, port))
}

/// Full validation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub apps: Vec<AppCheck>,
    pub conflicts: Vec<RouteConflict>,
    pub default_warning: Option<DefaultWarning>,
}

impl ValidationReport {
    pub fn status(&self) -> ValidationStatus {
        if self.apps.iter().any(|a| a.status.is_error()) {
            ValidationStatus::Failed
        } else if self.apps.iter().any(|a| a.status.is_warning()) || self.default_warning.is_some()
        {
            ValidationStatus::PassedWithWarnings
        } else {
            ValidationStatus::Passed
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.status().exit_code()
    }

    /// One line per unreachable app.
    pub fn connectivity_warnings(&self) -> Vec<String> {
        self.apps
            .iter()
            .filter_map(|a| match &a.status {
                AppStatus::Unreachable { hostname, port } => Some(format!(
                    "{}: cannot connect to {}:{}",
                    a.name, hostname, port
                )),
                _ => None,
            })
            .collect()
    }

    /// Catch-all ambiguity, if any, as a sentence.
    pub fn default_message(&self) -> Option<String> {
        match self.default_warning.as_ref()? {
            DefaultWarning::NoDefault { effective } => Some(format!(
                "no catch-all app; {} (lowest precedence) becomes the default",
                effective
            )),
            DefaultWarning::MultipleDefaults { active, candidates } => Some(format!(
                "multiple catch-all apps ({}); only {} is active",
                candidates.join(", "),
                active
            )),
        }
    }

    /// Human-readable warning lines, one per unreachable app or default issue.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = self.connectivity_warnings();
        warnings.extend(self.default_message());
        warnings
    }
}

/// Report which app wins each route listed by more than one app.
///
/// Lower priority wins; on equal priority the app listed first keeps the route.
pub fn detect_conflicts(apps: &[AppConfig]) -> Vec<RouteConflict> {
    let mut owners: HashMap<RouteMatch, &AppConfig> = HashMap::new();
    let mut conflicts = Vec::new();

    for app in apps {
        for route in &app.routes {
            let key = RouteMatch::parse(route);
            match owners.get(&key).copied() {
                None => {
                    owners.insert(key, app);
                }
                Some(existing) => {
                    let (winner, loser) = if app.priority < existing.priority {
                        owners.insert(key.clone(), app);
                        (app, existing)
                    } else {
                        (existing, app)
                    };
                    conflicts.push(RouteConflict {
                        route: key.path().to_string(),
                        winner: winner.name.clone(),
                        winner_priority: winner.priority,
                        overridden: loser.name.clone(),
                        overridden_priority: loser.priority,
                    });
                }
            }
        }
    }

    conflicts
}

/// Warn when no app, or more than one app, has an empty route list.
pub fn check_default(apps: &[AppConfig]) -> Option<DefaultWarning> {
    let sorted = sort_by_priority(apps);
    let candidates: Vec<&AppConfig> = sorted.iter().copied().filter(|a| a.is_catch_all()).collect();
    let effective = select_default(&sorted)?;

    match candidates.len() {
        0 => Some(DefaultWarning::NoDefault {
            effective: effective.name.clone(),
        }),
        1 => None,
        _ => Some(DefaultWarning::MultipleDefaults {
            active: effective.name.clone(),
            candidates: candidates.iter().map(|a| a.name.clone()).collect(),
        }),
    }
}

/// Validates application records against a [`Probe`].
pub struct Validator<P> {
    probe: P,
    timeout: Duration,
}

impl<P: Probe> Validator<P> {
    pub fn new(probe: P, timeout: Duration) -> Self {
        Self { probe, timeout }
    }

    async fn check_app(&self, app: &AppConfig) -> AppCheck {
        let status = match parse_host_port(&app.host) {
            None => {
                tracing::error!(app = %app.name, host = %app.host, "Malformed host");
                AppStatus::MalformedHost
            }
            Some((hostname, port)) => {
                if self.probe.probe(hostname, port, self.timeout).await {
                    AppStatus::Reachable {
                        hostname: hostname.to_string(),
                        port,
                    }
                } else {
                    AppStatus::Unreachable {
                        hostname: hostname.to_string(),
                        port,
                    }
                }
            }
        };

        AppCheck {
            name: app.name.clone(),
            host: app.host.clone(),
            routes: app.routes.clone(),
            priority: app.priority,
            status,
        }
    }

    /// Run all checks. Probes run concurrently; results keep app order.
    pub async fn validate(&self, apps: &[AppConfig]) -> ValidationReport {
        tracing::info!(apps = apps.len(), timeout_ms = self.timeout.as_millis() as u64, "Validating applications");

        let checks = join_all(apps.iter().map(|app| self.check_app(app))).await;

        ValidationReport {
            apps: checks,
            conflicts: detect_conflicts(apps),
            default_warning: check_default(apps),
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Found {} application(s)", self.apps.len())?;
        writeln!(f)?;

        for check in &self.apps {
            writeln!(f, "[{}]", check.name)?;
            match &check.status {
                AppStatus::MalformedHost => {
                    writeln!(f, "  error: malformed host: {}", check.host)?;
                    writeln!(f, "         expected HOST:PORT (e.g. 192.168.1.100:3000)")?;
                }
                AppStatus::Reachable { hostname, port }
                | AppStatus::Unreachable { hostname, port } => {
                    writeln!(f, "  host:     {}:{}", hostname, port)?;
                    if check.routes.is_empty() {
                        writeln!(f, "  routes:   (catch-all)")?;
                    } else {
                        writeln!(f, "  routes:   {}", check.routes.join(", "))?;
                    }
                    writeln!(f, "  priority: {}", check.priority)?;
                    let result = if check.status.is_warning() {
                        "cannot connect"
                    } else {
                        "ok"
                    };
                    writeln!(f, "  connection: {}", result)?;
                }
            }
            writeln!(f)?;
        }

        writeln!(f, "Route conflicts:")?;
        if self.conflicts.is_empty() {
            writeln!(f, "  none")?;
        }
        for c in &self.conflicts {
            writeln!(
                f,
                "  route {}: {} (priority {}) overrides {} (priority {})",
                c.route, c.winner, c.winner_priority, c.overridden, c.overridden_priority
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Default app:")?;
        match self.default_message() {
            Some(message) => writeln!(f, "  warning: {}", message)?,
            None => writeln!(f, "  ok")?,
        }

        writeln!(f)?;
        writeln!(f, "{}", "=".repeat(50))?;
        match self.status() {
            ValidationStatus::Failed => {
                writeln!(f, "Validation FAILED: fix the errors above")?;
            }
            ValidationStatus::PassedWithWarnings => {
                writeln!(f, "Validation completed with WARNINGS:")?;
                for warning in self.connectivity_warnings() {
                    writeln!(f, "  - {}", warning)?;
                }
                if self.default_warning.is_some() {
                    writeln!(f, "  - see Default app above")?;
                }
                if self.apps.iter().any(|a| a.status.is_warning()) {
                    writeln!(f, "Services may not be running yet; start them before the gateway.")?;
                }
            }
            ValidationStatus::Passed => {
                writeln!(f, "Validation PASSED: all configuration is valid")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::future::Future;

    /// Reports reachable only for listed `hostname:port` targets.
    struct StaticProbe(HashSet<String>);

    impl StaticProbe {
        fn reachable(targets: &[&str]) -> Self {
            Self(targets.iter().map(|t| t.to_string()).collect())
        }
    }

    impl Probe for StaticProbe {
        fn probe(
            &self,
            hostname: &str,
            port: u16,
            _timeout: Duration,
        ) -> impl Future<Output = bool> + Send {
            let hit = self.0.contains(&format!("{}:{}", hostname, port));
            async move { hit }
        }
    }

    #[test]
    fn test_parse_host_port() {
        assert_eq!(parse_host_port("10.0.0.1:3000"), Some(("10.0.0.1", 3000)));
        assert_eq!(parse_host_port("db.internal:5432"), Some(("db.internal", 5432)));
        assert_eq!(parse_host_port("not-a-valid-host"), None);
        assert_eq!(parse_host_port(":3000"), None);
        assert_eq!(parse_host_port("host:"), None);
        assert_eq!(parse_host_port("host:99999"), None);
        assert_eq!(parse_host_port("host:http"), None);
    }

    #[test]
    fn test_conflict_lower_priority_wins() {
        let apps = vec![
            AppConfig::new("LEGACY", "10.0.0.1:80")
                .with_priority(10)
                .with_routes(["/api"]),
            AppConfig::new("MODERN", "10.0.0.2:80")
                .with_priority(5)
                .with_routes(["/api"]),
        ];

        let conflicts = detect_conflicts(&apps);
        assert_eq!(
            conflicts,
            vec![RouteConflict {
                route: "/api".into(),
                winner: "MODERN".into(),
                winner_priority: 5,
                overridden: "LEGACY".into(),
                overridden_priority: 10,
            }]
        );
    }

    #[test]
    fn test_conflict_tie_keeps_first() {
        let apps = vec![
            AppConfig::new("A", "h:1").with_routes(["/x"]),
            AppConfig::new("B", "h:2").with_routes(["/x/"]),
        ];

        let conflicts = detect_conflicts(&apps);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].winner, "A");
        assert_eq!(conflicts[0].overridden, "B");
    }

    #[test]
    fn test_default_warnings() {
        let none = vec![
            AppConfig::new("A", "h:1").with_priority(1).with_routes(["/a"]),
            AppConfig::new("B", "h:2").with_priority(2).with_routes(["/b"]),
        ];
        assert_eq!(
            check_default(&none),
            Some(DefaultWarning::NoDefault {
                effective: "B".into()
            })
        );

        let many = vec![
            AppConfig::new("A", "h:1").with_priority(7),
            AppConfig::new("B", "h:2").with_priority(3),
        ];
        assert_eq!(
            check_default(&many),
            Some(DefaultWarning::MultipleDefaults {
                active: "B".into(),
                candidates: vec!["B".into(), "A".into()],
            })
        );

        let one = vec![
            AppConfig::new("A", "h:1"),
            AppConfig::new("B", "h:2").with_routes(["/b"]),
        ];
        assert_eq!(check_default(&one), None);
    }

    #[tokio::test]
    async fn test_malformed_host_fails() {
        let apps = vec![
            AppConfig::new("BROKEN", "not-a-valid-host"),
            AppConfig::new("OK", "10.0.0.1:3000").with_routes(["/ok"]),
        ];
        let validator = Validator::new(StaticProbe::reachable(&["10.0.0.1:3000"]), DEFAULT_PROBE_TIMEOUT);

        let report = validator.validate(&apps).await;
        assert_eq!(report.apps[0].status, AppStatus::MalformedHost);
        assert_eq!(report.status(), ValidationStatus::Failed);
        assert_eq!(report.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_is_warning() {
        let apps = vec![AppConfig::new("DOWN", "10.0.0.9:3000")];
        let validator = Validator::new(StaticProbe::reachable(&[]), DEFAULT_PROBE_TIMEOUT);

        let report = validator.validate(&apps).await;
        assert_eq!(
            report.apps[0].status,
            AppStatus::Unreachable {
                hostname: "10.0.0.9".into(),
                port: 3000
            }
        );
        assert_eq!(report.status(), ValidationStatus::PassedWithWarnings);
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.warnings(), vec!["DOWN: cannot connect to 10.0.0.9:3000"]);
    }

    #[tokio::test]
    async fn test_clean_pass_and_order() {
        let apps = vec![
            AppConfig::new("WEB", "10.0.0.1:80"),
            AppConfig::new("API", "10.0.0.2:8080").with_routes(["/api"]),
        ];
        let validator = Validator::new(
            StaticProbe::reachable(&["10.0.0.1:80", "10.0.0.2:8080"]),
            DEFAULT_PROBE_TIMEOUT,
        );

        let report = validator.validate(&apps).await;
        let names: Vec<_> = report.apps.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["WEB", "API"]);
        assert_eq!(report.status(), ValidationStatus::Passed);

        let text = report.to_string();
        assert!(text.contains("Found 2 application(s)"));
        assert!(text.contains("Validation PASSED"));
    }

    #[tokio::test]
    async fn test_failed_run_still_prints_default_warning() {
        let apps = vec![
            AppConfig::new("BAD", "not-a-valid-host").with_routes(["/bad"]),
            AppConfig::new("API", "127.0.0.1:1").with_routes(["/api"]),
        ];
        let validator = Validator::new(StaticProbe::reachable(&[]), DEFAULT_PROBE_TIMEOUT);

        let report = validator.validate(&apps).await;
        assert_eq!(report.status(), ValidationStatus::Failed);
        assert_eq!(
            report.default_warning,
            Some(DefaultWarning::NoDefault {
                effective: "API".into()
            })
        );

        let text = report.to_string();
        let section = text.find("Default app:").unwrap();
        let summary = text.find("Validation FAILED").unwrap();
        assert!(section < summary);
        assert!(text.contains("no catch-all app; API (lowest precedence) becomes the default"));
    }

    #[tokio::test]
    async fn test_default_warning_not_repeated_in_summary() {
        let apps = vec![
            AppConfig::new("A", "10.0.0.1:80").with_priority(1),
            AppConfig::new("B", "10.0.0.2:80").with_priority(2),
        ];
        let validator = Validator::new(
            StaticProbe::reachable(&["10.0.0.1:80", "10.0.0.2:80"]),
            DEFAULT_PROBE_TIMEOUT,
        );

        let report = validator.validate(&apps).await;
        assert_eq!(report.status(), ValidationStatus::PassedWithWarnings);
        assert!(report.connectivity_warnings().is_empty());

        let text = report.to_string();
        assert_eq!(text.matches("multiple catch-all apps (A, B); only A is active").count(), 1);
        assert!(text.contains("see Default app above"));
    }

    #[tokio::test]
    async fn test_report_serializes() {
        let apps = vec![AppConfig::new("BROKEN", "nohost")];
        let validator = Validator::new(StaticProbe::reachable(&[]), DEFAULT_PROBE_TIMEOUT);

        let report = validator.validate(&apps).await;
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["apps"][0]["status"], "malformed_host");
        assert_eq!(json["apps"][0]["name"], "BROKEN");
    }
}
