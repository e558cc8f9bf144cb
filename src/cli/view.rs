//! Read-only views: `status`, `trades` and `news`.
//!
//! These endpoints need no session, so the views fetch through the store
//! directly and render whatever it admitted.

use chrono::{DateTime, Local, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use tabled::Tabled;

use super::{one_shot_console, output};
use crate::config::Config;
use crate::domain::{NewsItem, SeverityCounts, StatusSnapshot, Trade};
use crate::error::Result;
use crate::port::Feed;

#[derive(Tabled)]
struct PositionRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Quantity")]
    quantity: Decimal,
}

#[derive(Tabled)]
struct AnalysisRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Signal")]
    signal: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Price")]
    price: Decimal,
    #[tabled(rename = "At")]
    at: String,
}

#[derive(Tabled)]
pub(crate) struct TradeRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Side")]
    side: String,
    #[tabled(rename = "Type")]
    order_type: String,
    #[tabled(rename = "Quantity")]
    quantity: Decimal,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Trade> for TradeRow {
    fn from(trade: &Trade) -> Self {
        Self {
            time: local_time(trade.timestamp),
            symbol: trade.symbol.clone(),
            side: trade.side.to_string(),
            order_type: trade.order_type.to_string(),
            quantity: trade.quantity,
            price: trade
                .filled_price
                .or(trade.price)
                .map_or_else(|| "-".to_string(), |p| p.to_string()),
            status: trade.status.to_string(),
        }
    }
}

#[derive(Tabled)]
struct NewsRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Sentiment")]
    sentiment: String,
}

impl From<&NewsItem> for NewsRow {
    fn from(item: &NewsItem) -> Self {
        Self {
            time: local_time(item.timestamp),
            title: item.title.clone(),
            source: item.source.clone(),
            sentiment: item.sentiment.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

pub(crate) fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

pub async fn status(config: &Config) -> Result<()> {
    let console = one_shot_console(config);
    let sync = console.sync();
    sync.refresh(Feed::Status).await?;
    let errors = match sync.refresh(Feed::Errors).await {
        Ok(_) => Some(console.error_log().summary()),
        Err(e) => {
            output::warning(&format!("Could not load errors: {e}"));
            None
        }
    };
    let Some(snapshot) = console.store().snapshot() else {
        output::warning("No status available");
        return Ok(());
    };

    if output::is_json() {
        output::json_output(json!({
            "command": "status",
            "status": snapshot,
            "unresolved_errors": errors.map(|c| c.total()),
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    render_snapshot(&snapshot, errors);
    Ok(())
}

pub(crate) fn render_snapshot(snapshot: &StatusSnapshot, errors: Option<SeverityCounts>) {
    let bot = &snapshot.bot;
    output::section("Bot");
    output::field(
        "State",
        if bot.running {
            output::positive("● running")
        } else {
            output::muted("○ stopped")
        },
    );
    output::field("Mode", output::highlight(bot.mode));
    output::field(
        "Symbols",
        bot.symbols.iter().cloned().collect::<Vec<_>>().join(", "),
    );

    let portfolio = &snapshot.portfolio;
    output::section("Portfolio");
    output::field("Total value", portfolio.total_value);
    output::field("Cash", portfolio.available_cash);
    output::field("Daily P&L", output::signed(portfolio.daily_pnl));
    output::field("Total P&L", output::signed(portfolio.total_pnl));
    let positions: Vec<_> = portfolio
        .positions
        .iter()
        .filter(|(_, qty)| !qty.is_zero())
        .map(|(symbol, quantity)| PositionRow {
            symbol: symbol.clone(),
            quantity: *quantity,
        })
        .collect();
    output::table(positions, "No open positions");

    let risk = &snapshot.risk;
    output::section("Risk");
    output::field("Level", risk.risk_level);
    output::field(
        "Trades today",
        format!("{}/{}", risk.daily_trades_count, risk.daily_trades_limit),
    );
    output::field(
        "Loss today",
        format!(
            "{} of {} ({}%)",
            risk.daily_loss, risk.daily_loss_limit, risk.daily_loss_percentage
        ),
    );
    output::field(
        "Trading",
        if risk.trading_enabled {
            output::positive("enabled")
        } else {
            output::negative("disabled")
        },
    );

    if !snapshot.last_analysis.is_empty() {
        output::section("Latest analysis");
        let rows = snapshot
            .last_analysis
            .iter()
            .map(|(symbol, a)| AnalysisRow {
                symbol: symbol.clone(),
                signal: a.signal.clone(),
                confidence: format!("{:.0}%", a.confidence * 100.0),
                price: a.price,
                at: local_time(a.timestamp),
            })
            .collect();
        output::table(rows, "");
    }

    if let Some(counts) = errors {
        output::section("Errors");
        if counts.total() == 0 {
            output::success("No unresolved errors");
        } else {
            output::field(
                "Unresolved",
                format!(
                    "{} critical, {} high, {} medium, {} low",
                    counts.critical, counts.high, counts.medium, counts.low
                ),
            );
        }
    }
}

pub async fn trades(config: &Config, limit: usize) -> Result<()> {
    let console = one_shot_console(config);
    console.sync().refresh(Feed::Trades).await?;
    let trades: Vec<Trade> = console.store().trades().into_iter().take(limit).collect();

    if output::is_json() {
        output::json_output(json!({ "command": "trades", "trades": trades }));
        return Ok(());
    }

    output::section("Trades");
    output::table(trades.iter().map(TradeRow::from).collect(), "No trades yet");
    Ok(())
}

pub async fn news(config: &Config, limit: Option<usize>) -> Result<()> {
    let mut config = config.clone();
    if let Some(limit) = limit.filter(|l| *l > 0) {
        config.polling.news_limit = limit;
    }
    let console = one_shot_console(&config);
    console.sync().refresh(Feed::News).await?;
    let news = console.store().news();

    if output::is_json() {
        output::json_output(json!({ "command": "news", "news": news }));
        return Ok(());
    }

    output::section("News");
    output::table(news.iter().map(NewsRow::from).collect(), "No news");
    Ok(())
}
