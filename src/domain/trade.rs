//! Trades as reported by the bot, and operator-initiated manual trades.
//!
//! A manual trade starts as a [`ManualTradeDraft`] holding raw operator
//! input. Only [`crate::application::validator::validate_manual_trade`]
//! produces the typed [`ManualTradeRequest`] that goes on the wire.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl FromStr for OrderSide {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            _ => Err(()),
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        })
    }
}

/// Order types seen in trade history. Manual trades accept only
/// [`OrderType::Market`] and [`OrderType::Limit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Market,
    Limit,
    Stop,
    StopLimit,
}

impl OrderType {
    #[must_use]
    pub const fn is_manual(self) -> bool {
        matches!(self, Self::Market | Self::Limit)
    }
}

impl FromStr for OrderType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "market" => Ok(Self::Market),
            "limit" => Ok(Self::Limit),
            "stop" => Ok(Self::Stop),
            "stop_limit" => Ok(Self::StopLimit),
            _ => Err(()),
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Market => "market",
            Self::Limit => "limit",
            Self::Stop => "stop",
            Self::StopLimit => "stop_limit",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Filled,
    Cancelled,
    Rejected,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Filled => "filled",
            Self::Cancelled => "cancelled",
            Self::Rejected => "rejected",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    #[serde(default)]
    pub id: Option<String>,
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Decimal,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(with = "super::time")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub filled_price: Option<Decimal>,
    #[serde(default)]
    pub filled_quantity: Option<Decimal>,
}

/// Unvalidated operator input for a manual trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualTradeDraft {
    pub symbol: String,
    pub side: String,
    pub quantity: Decimal,
    pub order_type: String,
}

impl ManualTradeDraft {
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        side: impl Into<String>,
        quantity: Decimal,
        order_type: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side: side.into(),
            quantity,
            order_type: order_type.into(),
        }
    }

    /// Market order draft.
    #[must_use]
    pub fn market(symbol: impl Into<String>, side: impl Into<String>, quantity: Decimal) -> Self {
        Self::new(symbol, side, quantity, "market")
    }
}

/// Validated manual trade, serialized as the `/api/trade/manual` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManualTradeRequest {
    pub symbol: String,
    pub side: OrderSide,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    pub order_type: OrderType,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn manual_request_wire_shape() {
        let request = ManualTradeRequest {
            symbol: "dogecoin".into(),
            side: OrderSide::Sell,
            quantity: dec!(12.5),
            order_type: OrderType::Limit,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "symbol": "dogecoin",
                "side": "sell",
                "quantity": 12.5,
                "order_type": "limit",
            })
        );
    }

    #[test]
    fn trade_history_row_parses() {
        let trade: Trade = serde_json::from_value(json!({
            "id": null,
            "symbol": "cardano",
            "side": "buy",
            "order_type": "stop_limit",
            "quantity": 3,
            "status": "filled",
            "timestamp": "2024-05-01T12:30:00.000001",
            "filled_price": 0.45,
        }))
        .unwrap();
        assert!(trade.id.is_none());
        assert_eq!(trade.order_type, OrderType::StopLimit);
        assert!(!trade.order_type.is_manual());
        assert_eq!(trade.filled_price, Some(dec!(0.45)));
        assert!(trade.filled_quantity.is_none());
    }

    #[test]
    fn side_and_type_parse_case_insensitively() {
        assert_eq!(" BUY ".parse::<OrderSide>(), Ok(OrderSide::Buy));
        assert_eq!("Limit".parse::<OrderType>(), Ok(OrderType::Limit));
        assert!("hold".parse::<OrderSide>().is_err());
    }
}
