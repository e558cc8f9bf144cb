//! Canonical last-known-good view of the bot.
//!
//! Status (bot, portfolio and risk together), trade history and news each
//! live in their own [`SequencedSlot`]. A failed fetch never reaches the
//! store, so the previous content stays in place.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::generation::Generation;
use super::slot::{Admission, SequencedSlot, Ticket};
use crate::domain::{BotState, NewsItem, RiskMetrics, StatusSnapshot, Trade};

#[derive(Debug)]
pub struct StatusStore {
    status: SequencedSlot<StatusSnapshot>,
    trades: SequencedSlot<Vec<Trade>>,
    news: SequencedSlot<Vec<NewsItem>>,
}

impl StatusStore {
    #[must_use]
    pub fn new(generation: Generation) -> Self {
        Self {
            status: SequencedSlot::new(generation.clone()),
            trades: SequencedSlot::new(generation.clone()),
            news: SequencedSlot::new(generation),
        }
    }

    #[must_use]
    pub fn generation(&self) -> &Generation {
        self.status.generation()
    }

    pub fn status_ticket(&self) -> Ticket {
        self.status.ticket()
    }

    pub fn trades_ticket(&self) -> Ticket {
        self.trades.ticket()
    }

    pub fn news_ticket(&self) -> Ticket {
        self.news.ticket()
    }

    pub fn apply_status(&self, ticket: Ticket, snapshot: StatusSnapshot) -> Admission {
        self.status.apply(ticket, snapshot)
    }

    /// Trade history is kept most recent first.
    pub fn apply_trades(&self, ticket: Ticket, mut trades: Vec<Trade>) -> Admission {
        trades.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.trades.apply(ticket, trades)
    }

    pub fn apply_news(&self, ticket: Ticket, mut news: Vec<NewsItem>) -> Admission {
        news.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.news.apply(ticket, news)
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<StatusSnapshot> {
        self.status.get()
    }

    #[must_use]
    pub fn bot_state(&self) -> Option<BotState> {
        self.status.with(|s| s.map(|s| s.bot.clone()))
    }

    #[must_use]
    pub fn risk(&self) -> Option<RiskMetrics> {
        self.status.with(|s| s.map(|s| s.risk.clone()))
    }

    /// Last known running flag; false until a status has been applied.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status.with(|s| s.is_some_and(|s| s.bot.running))
    }

    /// Last known trading permission. Unknown counts as enabled and is left
    /// to the server to decide. A reached daily loss limit disables trading
    /// even if the server still reports it enabled.
    #[must_use]
    pub fn trading_enabled(&self) -> bool {
        self.status.with(|s| {
            s.map_or(true, |s| {
                s.risk.trading_enabled && !s.risk.loss_limit_reached()
            })
        })
    }

    /// Symbols the bot last reported, empty if unknown.
    #[must_use]
    pub fn symbols(&self) -> BTreeSet<String> {
        self.status
            .with(|s| s.map(|s| s.bot.symbols.clone()).unwrap_or_default())
    }

    #[must_use]
    pub fn trades(&self) -> Vec<Trade> {
        self.trades.get().unwrap_or_default()
    }

    #[must_use]
    pub fn news(&self) -> Vec<NewsItem> {
        self.news.get().unwrap_or_default()
    }

    #[must_use]
    pub fn status_updated_at(&self) -> Option<DateTime<Utc>> {
        self.status.updated_at()
    }

    /// Forget everything, e.g. after logout.
    pub fn reset(&self) {
        self.status.clear();
        self.trades.clear();
        self.news.clear();
    }
}
