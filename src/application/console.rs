//! The operator console: one container owning the session, the store, the
//! polling loops and the command surface.
//!
//! State changes only through fetch completions and command results. Login
//! (or a restored token) triggers exactly one fetch of each feed, then the
//! polling loops take over one period later. Logout tears everything down
//! and advances the generation so late responses are dropped.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{info, warn};

use super::dispatcher::CommandDispatcher;
use super::error_log::ErrorLog;
use super::generation::Generation;
use super::scheduler::{PollSpec, PollingScheduler};
use super::session::{Session, SessionManager};
use super::store::StatusStore;
use super::sync::StoreSync;
use crate::config::Config;
use crate::error::AuthError;
use crate::port::{BotApi, ConsoleEvent, Feed, Notifier, TokenStore};

/// Tunables the console needs, extracted from [`Config`].
#[derive(Debug, Clone)]
pub struct ConsoleSettings {
    pub fast_interval: Duration,
    pub slow_interval: Duration,
    pub news_limit: usize,
    pub symbols: BTreeSet<String>,
    pub logout_timeout: Duration,
}

impl ConsoleSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            fast_interval: config.polling.fast_interval(),
            slow_interval: config.polling.slow_interval(),
            news_limit: config.polling.news_limit,
            symbols: config.console.symbol_set(),
            logout_timeout: config.session.logout_timeout(),
        }
    }
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Keeps the latest banner-worthy event and forwards everything.
struct BannerBoard {
    inner: Arc<dyn Notifier>,
    current: Mutex<Option<ConsoleEvent>>,
}

impl Notifier for BannerBoard {
    fn notify(&self, event: ConsoleEvent) {
        if event.is_banner() {
            *self.current.lock() = Some(event.clone());
        }
        self.inner.notify(event);
    }
}

pub struct Console {
    settings: ConsoleSettings,
    generation: Generation,
    board: Arc<BannerBoard>,
    session: Arc<SessionManager>,
    sync: StoreSync,
    dispatcher: CommandDispatcher,
    scheduler: PollingScheduler,
}

impl Console {
    #[must_use]
    pub fn new(
        settings: ConsoleSettings,
        api: Arc<dyn BotApi>,
        tokens: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let board = Arc::new(BannerBoard {
            inner: notifier,
            current: Mutex::new(None),
        });
        let notifier = Arc::clone(&board) as Arc<dyn Notifier>;
        let generation = Generation::new();

        let session = Arc::new(SessionManager::new(
            Arc::clone(&api),
            tokens,
            settings.logout_timeout,
        ));
        let store = Arc::new(StatusStore::new(generation.clone()));
        let error_log = Arc::new(ErrorLog::new(
            Arc::clone(&api),
            Arc::clone(&notifier),
            generation.clone(),
        ));
        let sync = StoreSync::new(Arc::clone(&api), store, error_log, settings.news_limit);
        let dispatcher = CommandDispatcher::new(
            api,
            Arc::clone(&session),
            sync.clone(),
            Arc::clone(&notifier),
            settings.symbols.clone(),
        );
        let scheduler = PollingScheduler::new(notifier);

        Self {
            settings,
            generation,
            board,
            session,
            sync,
            dispatcher,
            scheduler,
        }
    }

    /// Pick up a persisted session, if any, and start supervising.
    pub async fn resume(&self) -> bool {
        if !self.session.restore() {
            return false;
        }
        self.activate().await;
        true
    }

    /// Pick up a persisted session and load every feed once, without
    /// polling. For one-shot commands that need current guards.
    pub async fn attach(&self) -> bool {
        if !self.session.restore() {
            return false;
        }
        self.initial_load().await;
        true
    }

    pub async fn login(&self, password: &str) -> Result<Session, AuthError> {
        let session = self.session.login(password).await?;
        self.activate().await;
        Ok(session)
    }

    /// End the session. Local state is always cleared; returns whether the
    /// server acknowledged the logout.
    pub async fn logout(&self) -> bool {
        self.scheduler.stop();
        let generation = self.sync.end_session();
        info!(generation, "Console torn down");
        self.dismiss_banner();
        let acknowledged = self.session.logout().await;
        self.board.notify(ConsoleEvent::SessionEnded);
        acknowledged
    }

    /// Stop polling and invalidate every response still in flight.
    pub fn teardown(&self) {
        self.scheduler.stop();
        let generation = self.generation.advance();
        info!(generation, "Console torn down");
    }

    /// Fetch every feed once, concurrently, then start the polling loops.
    async fn activate(&self) {
        self.teardown();
        self.board.notify(ConsoleEvent::SessionStarted);
        self.initial_load().await;

        if !self.session.is_active() {
            warn!("Session ended during initial load, not polling");
            return;
        }
        let fast = self.settings.fast_interval;
        let slow = self.settings.slow_interval;
        let specs = vec![
            PollSpec::new(self.sync.job(Feed::Status), fast),
            PollSpec::new(self.sync.job(Feed::Trades), fast),
            PollSpec::new(self.sync.job(Feed::Errors), fast),
            PollSpec::new(self.sync.job(Feed::News), slow),
        ];
        self.scheduler.start(specs, self.session.subscribe());
    }

    async fn initial_load(&self) {
        let (status, trades, news, errors) = tokio::join!(
            self.sync.refresh(Feed::Status),
            self.sync.refresh(Feed::Trades),
            self.sync.refresh(Feed::News),
            self.sync.refresh(Feed::Errors),
        );
        for (feed, result) in [
            (Feed::Status, status),
            (Feed::Trades, trades),
            (Feed::News, news),
            (Feed::Errors, errors),
        ] {
            if let Err(e) = result {
                warn!(%feed, error = %e, "Initial load failed");
                self.board.notify(ConsoleEvent::RefreshFailed {
                    feed,
                    reason: e.to_string(),
                });
            }
        }
    }

    /// The latest banner, until dismissed or replaced.
    #[must_use]
    pub fn banner(&self) -> Option<ConsoleEvent> {
        self.board.current.lock().clone()
    }

    pub fn dismiss_banner(&self) {
        self.board.current.lock().take();
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_active()
    }

    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.scheduler.is_running()
    }

    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    #[must_use]
    pub fn store(&self) -> &StatusStore {
        self.sync.store()
    }

    #[must_use]
    pub fn error_log(&self) -> &ErrorLog {
        self.sync.error_log()
    }

    #[must_use]
    pub fn commands(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    #[must_use]
    pub fn sync(&self) -> &StoreSync {
        &self.sync
    }

    #[must_use]
    pub fn settings(&self) -> &ConsoleSettings {
        &self.settings
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        self.teardown();
    }
}
