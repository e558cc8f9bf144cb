//! Remote bot REST contract.
//!
//! Every call returns an explicit [`Result`]. Transport failures and
//! timeouts surface as network errors ([`crate::error::Error::is_network`]);
//! non-2xx responses surface as [`crate::error::Error::Server`] carrying the
//! bot's `detail` text.

use async_trait::async_trait;

use crate::domain::{
    CommandAck, ManualTradeRequest, NewsItem, StatusSnapshot, StrategyConfig, SystemError, Trade,
};
use crate::error::Result;

#[async_trait]
pub trait BotApi: Send + Sync {
    /// `POST /api/login`. Returns the session token.
    async fn login(&self, password: &str) -> Result<String>;

    /// `POST /api/logout`. Best-effort.
    async fn logout(&self, token: &str) -> Result<()>;

    /// `GET /api/status`.
    async fn status(&self) -> Result<StatusSnapshot>;

    /// `GET /api/trades`.
    async fn trades(&self) -> Result<Vec<Trade>>;

    /// `GET /api/news?limit=N`.
    async fn news(&self, limit: usize) -> Result<Vec<NewsItem>>;

    /// `GET /api/errors`.
    async fn errors(&self) -> Result<Vec<SystemError>>;

    /// `POST /api/errors/resolve/{id}`.
    async fn resolve_error(&self, id: &str) -> Result<()>;

    /// `POST /api/start`. An empty symbol list keeps the bot's current set.
    async fn start(&self, token: &str, symbols: &[String]) -> Result<CommandAck>;

    /// `POST /api/stop`.
    async fn stop(&self, token: &str) -> Result<CommandAck>;

    /// `POST /api/emergency-stop`.
    async fn emergency_stop(&self, token: &str) -> Result<CommandAck>;

    /// `POST /api/trade/manual`.
    async fn manual_trade(&self, token: &str, request: &ManualTradeRequest)
        -> Result<CommandAck>;

    /// `POST /api/strategy/update`.
    async fn update_strategy(&self, config: &StrategyConfig) -> Result<CommandAck>;

    /// `GET /api/strategy`.
    async fn strategy(&self) -> Result<StrategyConfig>;

    /// `GET /api/symbols`.
    async fn symbols(&self) -> Result<Vec<String>>;

    /// `POST /api/symbols/update`. Replaces the bot's symbol set.
    async fn update_symbols(&self, symbols: &[String]) -> Result<CommandAck>;

    /// `GET /healthz`.
    async fn health(&self) -> Result<()>;
}
