//! Operator commands.
//!
//! Each command kind is self-serializing: a second invocation while one of
//! the same kind is in flight is rejected, never queued. Local guards
//! (running state, validation, trading permission, session) reject before
//! any network call. Remote failures go to the notifier as banner events.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::session::SessionManager;
use super::sync::StoreSync;
use super::validator::validate_manual_trade;
use crate::domain::{CommandAck, CommandKind, ManualTradeDraft, StrategyConfig};
use crate::error::{CommandError, Result};
use crate::port::{BotApi, ConsoleEvent, Feed, Notifier};

type CommandResult = std::result::Result<CommandAck, CommandError>;

/// Releases a command kind's in-flight claim when dropped.
struct InFlightGuard {
    kind: CommandKind,
    in_flight: Arc<Mutex<HashSet<CommandKind>>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.lock().remove(&self.kind);
    }
}

pub struct CommandDispatcher {
    api: Arc<dyn BotApi>,
    session: Arc<SessionManager>,
    sync: StoreSync,
    notifier: Arc<dyn Notifier>,
    fallback_symbols: BTreeSet<String>,
    in_flight: Arc<Mutex<HashSet<CommandKind>>>,
    strategy_draft: Mutex<Option<StrategyConfig>>,
}

impl CommandDispatcher {
    #[must_use]
    pub fn new(
        api: Arc<dyn BotApi>,
        session: Arc<SessionManager>,
        sync: StoreSync,
        notifier: Arc<dyn Notifier>,
        fallback_symbols: BTreeSet<String>,
    ) -> Self {
        Self {
            api,
            session,
            sync,
            notifier,
            fallback_symbols,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            strategy_draft: Mutex::new(None),
        }
    }

    /// Start the bot. Rejected locally if the bot is last known running.
    /// Status is re-fetched whether the call succeeds or fails.
    pub async fn start(&self, symbols: &[String]) -> CommandResult {
        let _guard = self.claim(CommandKind::Start)?;
        if self.sync.store().is_running() {
            return Err(CommandError::AlreadyRunning);
        }
        let token = self.token()?;
        let generation = self.sync.generation();

        let result = self.api.start(&token, symbols).await;
        self.refresh(Feed::Status, generation).await;
        self.finish(CommandKind::Start, generation, result)
    }

    /// Stop the bot. No running-state guard: a stale cache must not block it.
    pub async fn stop(&self) -> CommandResult {
        let _guard = self.claim(CommandKind::Stop)?;
        let token = self.token()?;
        let generation = self.sync.generation();

        let result = self.api.stop(&token).await;
        self.refresh(Feed::Status, generation).await;
        self.finish(CommandKind::Stop, generation, result)
    }

    pub async fn emergency_stop(&self) -> CommandResult {
        let _guard = self.claim(CommandKind::EmergencyStop)?;
        let token = self.token()?;
        let generation = self.sync.generation();

        warn!("Emergency stop requested");
        let result = self.api.emergency_stop(&token).await;
        self.refresh(Feed::Status, generation).await;
        self.finish(CommandKind::EmergencyStop, generation, result)
    }

    /// Validate and place a manual trade.
    ///
    /// Allowed symbols are the bot's last reported set, or the configured
    /// fallback when the bot has not reported any yet.
    pub async fn manual_trade(&self, draft: &ManualTradeDraft) -> CommandResult {
        let request = validate_manual_trade(draft, &self.allowed_symbols())?;
        if !self.sync.store().trading_enabled() {
            return Err(CommandError::TradingDisabled);
        }
        let _guard = self.claim(CommandKind::ManualTrade)?;
        let token = self.token()?;
        let generation = self.sync.generation();

        let result = self.api.manual_trade(&token, &request).await;
        if result.is_ok() {
            info!(
                symbol = %request.symbol,
                side = %request.side,
                quantity = %request.quantity,
                "Manual trade accepted"
            );
            tokio::join!(
                self.refresh(Feed::Trades, generation),
                self.refresh(Feed::Status, generation)
            );
        }
        self.finish(CommandKind::ManualTrade, generation, result)
    }

    /// Push a strategy configuration. On success it becomes the current draft.
    pub async fn update_strategy(&self, config: StrategyConfig) -> CommandResult {
        let _guard = self.claim(CommandKind::UpdateStrategy)?;
        let generation = self.sync.generation();

        let result = self.api.update_strategy(&config).await;
        if result.is_ok() {
            info!(strategy = %config.name, "Strategy updated");
            *self.strategy_draft.lock() = Some(config);
            self.refresh(Feed::Status, generation).await;
        }
        self.finish(CommandKind::UpdateStrategy, generation, result)
    }

    /// Fetch the bot's active strategy and adopt it as the draft.
    pub async fn load_strategy(&self) -> Result<StrategyConfig> {
        let config = self.api.strategy().await?;
        *self.strategy_draft.lock() = Some(config.clone());
        Ok(config)
    }

    /// Symbols the bot is currently trading, as it reports them.
    pub async fn load_symbols(&self) -> Result<Vec<String>> {
        self.api.symbols().await
    }

    /// Replace the bot's symbol set. Status is re-fetched on success so the
    /// allowed symbols for manual trades follow.
    pub async fn update_symbols(&self, symbols: &[String]) -> CommandResult {
        let symbols: Vec<String> = symbols
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        if symbols.is_empty() {
            return Err(CommandError::NoSymbols);
        }
        let _guard = self.claim(CommandKind::UpdateSymbols)?;
        let generation = self.sync.generation();

        let result = self.api.update_symbols(&symbols).await;
        if result.is_ok() {
            info!(symbols = ?symbols, "Trading symbols updated");
            self.refresh(Feed::Status, generation).await;
        }
        self.finish(CommandKind::UpdateSymbols, generation, result)
    }

    #[must_use]
    pub fn strategy_draft(&self) -> Option<StrategyConfig> {
        self.strategy_draft.lock().clone()
    }

    #[must_use]
    pub fn is_in_flight(&self, kind: CommandKind) -> bool {
        self.in_flight.lock().contains(&kind)
    }

    #[must_use]
    pub fn allowed_symbols(&self) -> BTreeSet<String> {
        let reported = self.sync.store().symbols();
        if reported.is_empty() {
            self.fallback_symbols.clone()
        } else {
            reported
        }
    }

    fn claim(&self, kind: CommandKind) -> std::result::Result<InFlightGuard, CommandError> {
        if !self.in_flight.lock().insert(kind) {
            return Err(CommandError::InFlight(kind));
        }
        Ok(InFlightGuard {
            kind,
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    fn token(&self) -> std::result::Result<String, CommandError> {
        self.session.token().ok_or(CommandError::NotAuthenticated)
    }

    async fn refresh(&self, feed: Feed, generation: u64) {
        if let Err(e) = self.sync.refresh_within(feed, generation).await {
            warn!(%feed, error = %e, "Post-command refresh failed");
            self.notifier.notify(ConsoleEvent::RefreshFailed {
                feed,
                reason: e.to_string(),
            });
        }
    }

    /// Report a command result. Results from a session torn down while the
    /// command was out are returned but not reported.
    fn finish(
        &self,
        kind: CommandKind,
        generation: u64,
        result: Result<CommandAck>,
    ) -> CommandResult {
        if !self.sync.is_current(generation) {
            debug!(command = %kind, "Command finished after session ended");
            return result.map_err(CommandError::Remote);
        }
        match result {
            Ok(ack) => {
                info!(command = %kind, status = ?ack.status, "Command acknowledged");
                self.notifier.notify(ConsoleEvent::CommandSucceeded {
                    kind,
                    summary: ack.summary(),
                });
                Ok(ack)
            }
            Err(e) => {
                warn!(command = %kind, error = %e, "Command failed");
                self.notifier.notify(ConsoleEvent::CommandFailed {
                    kind,
                    reason: e.to_string(),
                });
                if e.is_unauthorized() {
                    self.end_session();
                }
                Err(CommandError::Remote(e))
            }
        }
    }

    /// The bot rejected the token: tear down the same way logout does.
    fn end_session(&self) {
        self.session.invalidate();
        let generation = self.sync.end_session();
        info!(generation, "Session ended by rejected token");
        self.notifier.notify(ConsoleEvent::SessionEnded);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rust_decimal_macros::dec;

    use super::*;
    use crate::application::{ErrorLog, Generation, StatusStore};
    use crate::error::ValidationError;
    use crate::port::TokenStore;
    use crate::testkit::{fixtures, Endpoint, FakeBotApi, MemoryTokenStore, RecordingNotifier};

    struct Harness {
        api: Arc<FakeBotApi>,
        notifier: Arc<RecordingNotifier>,
        dispatcher: CommandDispatcher,
    }

    fn harness() -> Harness {
        let api = Arc::new(FakeBotApi::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let api_dyn = Arc::clone(&api) as Arc<dyn BotApi>;
        let notifier_dyn = Arc::clone(&notifier) as Arc<dyn Notifier>;
        let tokens = Arc::new(MemoryTokenStore::with_token(FakeBotApi::TOKEN)) as Arc<dyn TokenStore>;
        let session = Arc::new(SessionManager::new(
            Arc::clone(&api_dyn),
            tokens,
            Duration::from_secs(1),
        ));
        session.restore();
        let generation = Generation::new();
        let sync = StoreSync::new(
            Arc::clone(&api_dyn),
            Arc::new(StatusStore::new(generation.clone())),
            Arc::new(ErrorLog::new(
                Arc::clone(&api_dyn),
                Arc::clone(&notifier_dyn),
                generation,
            )),
            10,
        );
        let dispatcher = CommandDispatcher::new(
            api_dyn,
            session,
            sync,
            notifier_dyn,
            ["dogecoin".to_string()].into_iter().collect(),
        );
        Harness {
            api,
            notifier,
            dispatcher,
        }
    }

    #[tokio::test]
    async fn start_refreshes_status_after_success() {
        let h = harness();
        h.dispatcher.start(&[]).await.unwrap();
        assert_eq!(h.api.calls_to(Endpoint::Start), 1);
        assert_eq!(h.api.calls_to(Endpoint::Status), 1);
    }

    #[tokio::test]
    async fn failed_stop_still_refreshes_and_raises_banner() {
        let h = harness();
        h.api.fail_next(
            Endpoint::Stop,
            crate::error::Error::Server {
                status: 500,
                detail: "bot wedged".into(),
            },
        );

        let err = h.dispatcher.stop().await.unwrap_err();

        assert!(!err.is_local());
        assert_eq!(h.api.calls_to(Endpoint::Status), 1);
        assert_eq!(h.notifier.banners().len(), 1);
    }

    #[tokio::test]
    async fn fallback_symbols_apply_until_bot_reports() {
        let h = harness();
        let draft = ManualTradeDraft::market("cardano", "buy", dec!(1));
        assert!(matches!(
            h.dispatcher.manual_trade(&draft).await,
            Err(CommandError::Validation(ValidationError::UnknownSymbol { .. }))
        ));

        h.api.set_status(fixtures::snapshot(false));
        h.dispatcher.sync.refresh_status().await.unwrap();
        h.dispatcher.manual_trade(&draft).await.unwrap();
        assert_eq!(h.api.calls_to(Endpoint::ManualTrade), 1);
    }

    #[tokio::test]
    async fn local_rejections_raise_no_banner() {
        let h = harness();
        let draft = ManualTradeDraft::market("dogecoin", "buy", dec!(0));
        assert!(h.dispatcher.manual_trade(&draft).await.is_err());
        assert!(h.notifier.banners().is_empty());
    }

    #[tokio::test]
    async fn strategy_update_becomes_draft() {
        let h = harness();
        let config = StrategyConfig::new("momentum");

        h.dispatcher.update_strategy(config.clone()).await.unwrap();

        assert_eq!(h.dispatcher.strategy_draft(), Some(config));
        assert_eq!(h.api.calls_to(Endpoint::Status), 1);
    }

    #[tokio::test]
    async fn in_flight_claim_is_released_after_failure() {
        let h = harness();
        h.api
            .fail_next(Endpoint::EmergencyStop, crate::error::Error::Connection("x".into()));
        assert!(h.dispatcher.emergency_stop().await.is_err());
        assert!(!h.dispatcher.is_in_flight(CommandKind::EmergencyStop));
        assert!(h.dispatcher.emergency_stop().await.is_ok());
    }
}
