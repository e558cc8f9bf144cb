//! Bot lifecycle state as last reported by `/api/status`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Whether the bot trades with real money.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    #[default]
    Paper,
    Live,
}

impl TradingMode {
    #[must_use]
    pub const fn from_paper_flag(paper_trading_mode: bool) -> Self {
        if paper_trading_mode {
            Self::Paper
        } else {
            Self::Live
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paper => "paper",
            Self::Live => "live",
        }
    }
}

impl std::fmt::Display for TradingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotState {
    pub running: bool,
    pub mode: TradingMode,
    pub symbols: BTreeSet<String>,
}

impl BotState {
    #[must_use]
    pub fn new(running: bool, mode: TradingMode, symbols: impl IntoIterator<Item = String>) -> Self {
        Self {
            running,
            mode,
            symbols: symbols.into_iter().collect(),
        }
    }
}
