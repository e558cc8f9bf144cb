//! Grouped status snapshot taken from a single `/api/status` response.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BotState, Portfolio, RiskMetrics};

/// Latest strategy verdict for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub signal: String,
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: String,
    pub price: Decimal,
    #[serde(with = "super::time")]
    pub timestamp: DateTime<Utc>,
}

/// Bot, portfolio and risk state. Always replaced together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub bot: BotState,
    pub portfolio: Portfolio,
    pub risk: RiskMetrics,
    pub last_analysis: BTreeMap<String, AnalysisSummary>,
}
