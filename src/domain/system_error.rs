//! Operational errors reported by the bot through `/api/errors`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ApiLimit,
    NetworkError,
    TradingError,
    #[serde(rename = "auth_error")]
    AuthenticationError,
    DataError,
    SystemError,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemError {
    pub id: String,
    #[serde(default)]
    pub severity: Severity,
    pub error_type: ErrorKind,
    pub message: String,
    #[serde(default)]
    pub details: Map<String, Value>,
    /// Only ever changed by the server.
    #[serde(default)]
    pub resolved: bool,
    #[serde(with = "super::time")]
    pub timestamp: DateTime<Utc>,
}

/// Unresolved error counts by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    #[must_use]
    pub fn tally<'a>(errors: impl IntoIterator<Item = &'a SystemError>) -> Self {
        errors
            .into_iter()
            .filter(|e| !e.resolved)
            .fold(Self::default(), |mut counts, e| {
                match e.severity {
                    Severity::Critical => counts.critical += 1,
                    Severity::High => counts.high += 1,
                    Severity::Medium => counts.medium += 1,
                    Severity::Low => counts.low += 1,
                }
                counts
            })
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}
