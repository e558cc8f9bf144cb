//! Server-authoritative domain types.
//!
//! Everything here except [`StrategyConfig`] and [`ManualTradeDraft`] is a
//! read-only reflection of the remote bot's state, replaced wholesale on
//! every successful fetch.

mod bot;
mod command;
mod news;
mod portfolio;
mod risk;
mod status;
mod strategy;
mod system_error;
mod trade;

pub mod time;

pub use bot::{BotState, TradingMode};
pub use command::{CommandAck, CommandKind};
pub use news::NewsItem;
pub use portfolio::Portfolio;
pub use risk::{RiskLevel, RiskMetrics};
pub use status::{AnalysisSummary, StatusSnapshot};
pub use strategy::StrategyConfig;
pub use system_error::{ErrorKind, Severity, SeverityCounts, SystemError};
pub use trade::{ManualTradeDraft, ManualTradeRequest, OrderSide, OrderStatus, OrderType, Trade};
