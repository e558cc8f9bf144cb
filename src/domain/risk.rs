//! Risk posture computed by the bot.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub daily_trades_count: u32,
    pub daily_trades_limit: u32,
    pub daily_loss: Decimal,
    pub daily_loss_limit: Decimal,
    pub daily_loss_percentage: Decimal,
    pub risk_level: RiskLevel,
    pub trading_enabled: bool,
    #[serde(default)]
    pub max_trade_value: Option<Decimal>,
}

impl RiskMetrics {
    #[must_use]
    pub fn loss_limit_reached(&self) -> bool {
        self.daily_loss >= self.daily_loss_limit
    }

    #[must_use]
    pub const fn trade_limit_reached(&self) -> bool {
        self.daily_trades_count >= self.daily_trades_limit
    }

    /// The bot never reports trading enabled once the loss limit is hit.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        !(self.trading_enabled && self.loss_limit_reached())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn metrics(loss: Decimal, limit: Decimal, enabled: bool) -> RiskMetrics {
        RiskMetrics {
            daily_trades_count: 1,
            daily_trades_limit: 10,
            daily_loss: loss,
            daily_loss_limit: limit,
            daily_loss_percentage: Decimal::ZERO,
            risk_level: RiskLevel::Low,
            trading_enabled: enabled,
            max_trade_value: None,
        }
    }

    #[test]
    fn enabled_past_loss_limit_is_inconsistent() {
        assert!(!metrics(dec!(10), dec!(10), true).is_consistent());
        assert!(metrics(dec!(10), dec!(10), false).is_consistent());
        assert!(metrics(dec!(5), dec!(10), true).is_consistent());
    }

    #[test]
    fn risk_level_uses_uppercase_wire_names() {
        let level: RiskLevel = serde_json::from_str("\"MEDIUM\"").unwrap();
        assert_eq!(level, RiskLevel::Medium);
        assert!(RiskLevel::High > RiskLevel::Low);
    }
}
