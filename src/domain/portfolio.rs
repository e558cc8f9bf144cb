//! Portfolio snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub total_value: Decimal,
    pub available_cash: Decimal,
    /// Symbol to held quantity.
    #[serde(default)]
    pub positions: BTreeMap<String, Decimal>,
    pub daily_pnl: Decimal,
    pub total_pnl: Decimal,
    #[serde(with = "super::time")]
    pub last_updated: DateTime<Utc>,
}

impl Portfolio {
    /// Held quantity for `symbol`, zero when flat.
    #[must_use]
    pub fn position(&self, symbol: &str) -> Decimal {
        self.positions.get(symbol).copied().unwrap_or_default()
    }

    /// Symbols with a non-zero holding.
    pub fn open_symbols(&self) -> impl Iterator<Item = &str> {
        self.positions
            .iter()
            .filter(|(_, qty)| !qty.is_zero())
            .map(|(symbol, _)| symbol.as_str())
    }

    /// Cash is part of total value whenever anything is held, and no
    /// position is negative.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let non_negative = self.positions.values().all(|qty| !qty.is_sign_negative());
        let cash_within_value =
            self.positions.is_empty() || self.total_value >= self.available_cash;
        non_negative && cash_within_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn portfolio(total: Decimal, cash: Decimal, positions: &[(&str, Decimal)]) -> Portfolio {
        Portfolio {
            total_value: total,
            available_cash: cash,
            positions: positions
                .iter()
                .map(|(s, q)| ((*s).to_string(), *q))
                .collect(),
            daily_pnl: Decimal::ZERO,
            total_pnl: Decimal::ZERO,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn cash_above_value_is_inconsistent_only_with_positions() {
        assert!(portfolio(dec!(50), dec!(100), &[]).is_consistent());
        assert!(!portfolio(dec!(50), dec!(100), &[("dogecoin", dec!(10))]).is_consistent());
        assert!(portfolio(dec!(150), dec!(100), &[("dogecoin", dec!(10))]).is_consistent());
    }

    #[test]
    fn negative_position_is_inconsistent() {
        assert!(!portfolio(dec!(150), dec!(100), &[("dogecoin", dec!(-1))]).is_consistent());
    }

    #[test]
    fn flat_symbols_are_not_open() {
        let p = portfolio(
            dec!(150),
            dec!(100),
            &[("dogecoin", dec!(10)), ("cardano", dec!(0))],
        );
        assert_eq!(p.open_symbols().collect::<Vec<_>>(), vec!["dogecoin"]);
        assert_eq!(p.position("cardano"), Decimal::ZERO);
        assert_eq!(p.position("stellar"), Decimal::ZERO);
    }

    #[test]
    fn deserializes_wire_shape() {
        let p: Portfolio = serde_json::from_value(serde_json::json!({
            "total_value": 1000.0,
            "available_cash": 400,
            "positions": {"dogecoin": 1500},
            "daily_pnl": -2.5,
            "total_pnl": 12,
            "last_updated": "2024-05-01T12:30:00.5"
        }))
        .unwrap();
        assert_eq!(p.total_value, dec!(1000));
        assert_eq!(p.daily_pnl, dec!(-2.5));
        assert_eq!(p.position("dogecoin"), dec!(1500));
    }
}
