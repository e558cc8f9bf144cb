//! Scriptable in-memory bot.
//!
//! Every call is counted per [`Endpoint`]. Failures queued with
//! [`FakeBotApi::fail_next`] are returned one per call. Delays are real
//! `tokio::time::sleep`s, so tests under a paused clock control exactly
//! when each response lands.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::fixtures;
use crate::domain::{
    CommandAck, ManualTradeRequest, NewsItem, StatusSnapshot, StrategyConfig, SystemError, Trade,
};
use crate::error::{Error, Result};
use crate::port::BotApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Login,
    Logout,
    Status,
    Trades,
    News,
    Errors,
    ResolveError,
    Start,
    Stop,
    EmergencyStop,
    ManualTrade,
    UpdateStrategy,
    Strategy,
    Symbols,
    UpdateSymbols,
    Health,
}

struct State {
    calls: HashMap<Endpoint, u32>,
    failures: HashMap<Endpoint, VecDeque<Error>>,
    delays: HashMap<Endpoint, Duration>,
    status: StatusSnapshot,
    scripted_status: VecDeque<(StatusSnapshot, Duration)>,
    trades: Vec<Trade>,
    news: Vec<NewsItem>,
    errors: Vec<SystemError>,
    strategy: StrategyConfig,
    apply_resolves: bool,
    last_news_limit: Option<usize>,
    last_start_symbols: Option<Vec<String>>,
    manual_trades: Vec<ManualTradeRequest>,
}

pub struct FakeBotApi {
    state: Mutex<State>,
}

impl Default for FakeBotApi {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBotApi {
    /// The only password the fake accepts.
    pub const PASSWORD: &'static str = "correct-horse";
    /// Token issued on login; token-bearing calls with any other token get 401.
    pub const TOKEN: &'static str = "session-token-1";

    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                calls: HashMap::new(),
                failures: HashMap::new(),
                delays: HashMap::new(),
                status: fixtures::snapshot(false),
                scripted_status: VecDeque::new(),
                trades: Vec::new(),
                news: Vec::new(),
                errors: Vec::new(),
                strategy: StrategyConfig::new("default"),
                apply_resolves: true,
                last_news_limit: None,
                last_start_symbols: None,
                manual_trades: Vec::new(),
            }),
        }
    }

    pub fn calls_to(&self, endpoint: Endpoint) -> u32 {
        self.state.lock().calls.get(&endpoint).copied().unwrap_or(0)
    }

    /// Fail the next call to `endpoint` with `error`. Queued failures are
    /// consumed in order.
    pub fn fail_next(&self, endpoint: Endpoint, error: Error) {
        self.state
            .lock()
            .failures
            .entry(endpoint)
            .or_default()
            .push_back(error);
    }

    /// Delay every response from `endpoint`.
    pub fn set_delay(&self, endpoint: Endpoint, delay: Duration) {
        self.state.lock().delays.insert(endpoint, delay);
    }

    /// Status returned when nothing is scripted.
    pub fn set_status(&self, snapshot: StatusSnapshot) {
        self.state.lock().status = snapshot;
    }

    /// Script the next status call: it answers `snapshot` after `delay`.
    pub fn push_status(&self, snapshot: StatusSnapshot, delay: Duration) {
        self.state
            .lock()
            .scripted_status
            .push_back((snapshot, delay));
    }

    pub fn set_trades(&self, trades: Vec<Trade>) {
        self.state.lock().trades = trades;
    }

    pub fn set_news(&self, news: Vec<NewsItem>) {
        self.state.lock().news = news;
    }

    pub fn set_errors(&self, errors: Vec<SystemError>) {
        self.state.lock().errors = errors;
    }

    pub fn set_strategy(&self, strategy: StrategyConfig) {
        self.state.lock().strategy = strategy;
    }

    /// Acknowledge resolve calls without changing anything.
    pub fn ignore_resolves(&self) {
        self.state.lock().apply_resolves = false;
    }

    pub fn last_news_limit(&self) -> Option<usize> {
        self.state.lock().last_news_limit
    }

    pub fn last_start_symbols(&self) -> Option<Vec<String>> {
        self.state.lock().last_start_symbols.clone()
    }

    pub fn manual_trades(&self) -> Vec<ManualTradeRequest> {
        self.state.lock().manual_trades.clone()
    }

    /// Count the call and take its scripted failure and delay.
    fn enter(&self, endpoint: Endpoint) -> (Option<Error>, Duration) {
        let mut state = self.state.lock();
        *state.calls.entry(endpoint).or_insert(0) += 1;
        let failure = state
            .failures
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front);
        let delay = state.delays.get(&endpoint).copied().unwrap_or_default();
        (failure, delay)
    }

    async fn call(&self, endpoint: Endpoint) -> Result<()> {
        let (failure, delay) = self.enter(endpoint);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        failure.map_or(Ok(()), Err)
    }

    async fn authorized(&self, endpoint: Endpoint, token: &str) -> Result<()> {
        self.call(endpoint).await?;
        if token != Self::TOKEN {
            return Err(unauthorized("Invalid token"));
        }
        Ok(())
    }
}

fn unauthorized(detail: &str) -> Error {
    Error::Server {
        status: 401,
        detail: detail.to_string(),
    }
}

fn ack(status: &str, message: &str) -> CommandAck {
    CommandAck {
        status: Some(status.to_string()),
        message: Some(message.to_string()),
    }
}

#[async_trait]
impl BotApi for FakeBotApi {
    async fn login(&self, password: &str) -> Result<String> {
        self.call(Endpoint::Login).await?;
        if password != Self::PASSWORD {
            return Err(unauthorized("Invalid password"));
        }
        Ok(Self::TOKEN.to_string())
    }

    async fn logout(&self, _token: &str) -> Result<()> {
        self.call(Endpoint::Logout).await
    }

    async fn status(&self) -> Result<StatusSnapshot> {
        let (failure, default_delay) = self.enter(Endpoint::Status);
        let (snapshot, delay) = {
            let mut state = self.state.lock();
            let scripted = state.scripted_status.pop_front();
            scripted.unwrap_or_else(|| (state.status.clone(), default_delay))
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(snapshot),
        }
    }

    async fn trades(&self) -> Result<Vec<Trade>> {
        self.call(Endpoint::Trades).await?;
        Ok(self.state.lock().trades.clone())
    }

    async fn news(&self, limit: usize) -> Result<Vec<NewsItem>> {
        self.state.lock().last_news_limit = Some(limit);
        self.call(Endpoint::News).await?;
        let news = self.state.lock().news.iter().take(limit).cloned().collect();
        Ok(news)
    }

    async fn errors(&self) -> Result<Vec<SystemError>> {
        self.call(Endpoint::Errors).await?;
        Ok(self.state.lock().errors.clone())
    }

    async fn resolve_error(&self, id: &str) -> Result<()> {
        self.call(Endpoint::ResolveError).await?;
        let mut state = self.state.lock();
        let apply = state.apply_resolves;
        let Some(entry) = state.errors.iter_mut().find(|e| e.id == id) else {
            return Err(Error::Server {
                status: 404,
                detail: "Error not found".to_string(),
            });
        };
        if apply {
            entry.resolved = true;
        }
        Ok(())
    }

    async fn start(&self, token: &str, symbols: &[String]) -> Result<CommandAck> {
        self.state.lock().last_start_symbols = Some(symbols.to_vec());
        self.authorized(Endpoint::Start, token).await?;
        self.state.lock().status.bot.running = true;
        Ok(ack("starting", "Trading bot started"))
    }

    async fn stop(&self, token: &str) -> Result<CommandAck> {
        self.authorized(Endpoint::Stop, token).await?;
        self.state.lock().status.bot.running = false;
        Ok(ack("stopping", "Trading bot stopped"))
    }

    async fn emergency_stop(&self, token: &str) -> Result<CommandAck> {
        self.authorized(Endpoint::EmergencyStop, token).await?;
        self.state.lock().status.bot.running = false;
        Ok(ack("emergency_stopped", "Emergency stop executed"))
    }

    async fn manual_trade(
        &self,
        token: &str,
        request: &ManualTradeRequest,
    ) -> Result<CommandAck> {
        self.authorized(Endpoint::ManualTrade, token).await?;
        let mut state = self.state.lock();
        state.manual_trades.push(request.clone());
        let mut trade = fixtures::trade_at(&request.symbol, 0);
        trade.side = request.side;
        trade.order_type = request.order_type;
        trade.quantity = request.quantity;
        state.trades.push(trade);
        Ok(ack("executed", "Manual trade executed"))
    }

    async fn update_strategy(&self, config: &StrategyConfig) -> Result<CommandAck> {
        self.call(Endpoint::UpdateStrategy).await?;
        self.state.lock().strategy = config.clone();
        Ok(ack("updated", "Strategy updated"))
    }

    async fn strategy(&self) -> Result<StrategyConfig> {
        self.call(Endpoint::Strategy).await?;
        Ok(self.state.lock().strategy.clone())
    }

    async fn symbols(&self) -> Result<Vec<String>> {
        self.call(Endpoint::Symbols).await?;
        Ok(self.state.lock().status.bot.symbols.iter().cloned().collect())
    }

    async fn update_symbols(&self, symbols: &[String]) -> Result<CommandAck> {
        self.call(Endpoint::UpdateSymbols).await?;
        self.state.lock().status.bot.symbols = symbols.iter().cloned().collect();
        Ok(ack("success", "Trading symbols updated"))
    }

    async fn health(&self) -> Result<()> {
        self.call(Endpoint::Health).await
    }
}
