//! Validation results.
//!
//! # States
//! ```text
//! per app:  MalformedHost (error) | Unreachable (warning) | Reachable
//! overall:  Failed       if any app has a malformed host
//!           PassedWithWarnings if any app is unreachable or the default
//!                        route is ambiguous
//!           Passed       otherwise
//! ```

use serde::Serialize;

/// Outcome for one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AppStatus {
    /// Host is not `hostname:port`; no probe was attempted.
    MalformedHost,
    /// Probe failed or timed out.
    Unreachable { hostname: String, port: u16 },
    Reachable { hostname: String, port: u16 },
}

impl AppStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, AppStatus::MalformedHost)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, AppStatus::Unreachable { .. })
    }
}

/// Per-app line of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppCheck {
    pub name: String,
    pub host: String,
    pub routes: Vec<String>,
    pub priority: i64,
    #[serde(flatten)]
    pub status: AppStatus,
}

/// Two apps claiming the same route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteConflict {
    pub route: String,
    pub winner: String,
    pub winner_priority: i64,
    pub overridden: String,
    pub overridden_priority: i64,
}

/// Catch-all ambiguity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DefaultWarning {
    /// Every app has routes; `effective` becomes the catch-all.
    NoDefault { effective: String },
    /// Several apps have no routes; only `active` serves the catch-all.
    MultipleDefaults {
        active: String,
        candidates: Vec<String>,
    },
}

/// Overall verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Passed,
    PassedWithWarnings,
    Failed,
}

impl ValidationStatus {
    pub fn exit_code(&self) -> u8 {
        match self {
            ValidationStatus::Failed => 1,
            ValidationStatus::Passed | ValidationStatus::PassedWithWarnings => 0,
        }
    }
}
