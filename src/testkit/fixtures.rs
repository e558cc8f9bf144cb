//! Builders for domain values so tests focus on assertions rather than
//! construction boilerplate.

use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use serde_json::Map;

use crate::domain::{
    BotState, ErrorKind, NewsItem, OrderSide, OrderStatus, OrderType, Portfolio, RiskLevel,
    RiskMetrics, Severity, StatusSnapshot, SystemError, Trade, TradingMode,
};

/// Symbols every fixture snapshot reports.
pub const SYMBOLS: [&str; 4] = ["dogecoin", "cardano", "stellar", "polygon"];

/// A paper-trading snapshot with trading enabled and an idle portfolio.
pub fn snapshot(running: bool) -> StatusSnapshot {
    StatusSnapshot {
        bot: BotState::new(
            running,
            TradingMode::Paper,
            SYMBOLS.iter().map(|s| s.to_string()),
        ),
        portfolio: Portfolio {
            total_value: dec!(10000),
            available_cash: dec!(10000),
            positions: BTreeMap::new(),
            daily_pnl: dec!(0),
            total_pnl: dec!(0),
            last_updated: Utc::now(),
        },
        risk: RiskMetrics {
            daily_trades_count: 0,
            daily_trades_limit: 50,
            daily_loss: dec!(0),
            daily_loss_limit: dec!(500),
            daily_loss_percentage: dec!(0),
            risk_level: RiskLevel::Low,
            trading_enabled: true,
            max_trade_value: Some(dec!(1000)),
        },
        last_analysis: BTreeMap::new(),
    }
}

/// A snapshot whose risk limits have disabled trading.
pub fn halted_snapshot() -> StatusSnapshot {
    let mut snapshot = snapshot(true);
    snapshot.risk.daily_loss = dec!(500);
    snapshot.risk.daily_loss_percentage = dec!(5);
    snapshot.risk.risk_level = RiskLevel::High;
    snapshot.risk.trading_enabled = false;
    snapshot
}

/// A filled market buy placed `secs_ago` seconds ago.
pub fn trade_at(symbol: &str, secs_ago: i64) -> Trade {
    Trade {
        id: Some(format!("{symbol}-{secs_ago}")),
        symbol: symbol.to_string(),
        side: OrderSide::Buy,
        order_type: OrderType::Market,
        quantity: dec!(10),
        price: None,
        status: OrderStatus::Filled,
        timestamp: Utc::now() - Duration::seconds(secs_ago),
        filled_price: Some(dec!(0.12)),
        filled_quantity: Some(dec!(10)),
    }
}

pub fn system_error(id: &str, severity: Severity) -> SystemError {
    system_error_at(id, severity, 0)
}

/// An unresolved error logged `secs_ago` seconds ago.
pub fn system_error_at(id: &str, severity: Severity, secs_ago: i64) -> SystemError {
    SystemError {
        id: id.to_string(),
        severity,
        error_type: ErrorKind::NetworkError,
        message: format!("{id} happened"),
        details: Map::new(),
        resolved: false,
        timestamp: Utc::now() - Duration::seconds(secs_ago),
    }
}

pub fn news_item(title: &str, secs_ago: i64) -> NewsItem {
    NewsItem {
        title: title.to_string(),
        content: String::new(),
        source: "wire".to_string(),
        sentiment: Some("neutral".to_string()),
        timestamp: Utc::now() - Duration::seconds(secs_ago),
        symbols: vec!["dogecoin".to_string()],
    }
}
