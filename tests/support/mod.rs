#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use helmsman::application::{Console, ConsoleSettings};
use helmsman::port::{BotApi, Notifier, TokenStore};
use helmsman::testkit::{FakeBotApi, MemoryTokenStore, RecordingNotifier};

pub const FAST: Duration = Duration::from_secs(5);
pub const SLOW: Duration = Duration::from_secs(60);

/// A console wired to in-memory fakes.
pub struct Rig {
    pub api: Arc<FakeBotApi>,
    pub tokens: Arc<MemoryTokenStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub console: Console,
}

impl Rig {
    /// No persisted session.
    pub fn new() -> Self {
        Self::with_tokens(MemoryTokenStore::new())
    }

    /// A persisted session holding the token the fake bot accepts.
    pub fn logged_in() -> Self {
        Self::with_tokens(MemoryTokenStore::with_token(FakeBotApi::TOKEN))
    }

    pub fn with_tokens(tokens: MemoryTokenStore) -> Self {
        let api = Arc::new(FakeBotApi::new());
        let tokens = Arc::new(tokens);
        let notifier = Arc::new(RecordingNotifier::new());
        let console = Console::new(
            settings(),
            Arc::clone(&api) as Arc<dyn BotApi>,
            Arc::clone(&tokens) as Arc<dyn TokenStore>,
            Arc::clone(&notifier) as Arc<dyn Notifier>,
        );
        Self {
            api,
            tokens,
            notifier,
            console,
        }
    }
}

pub fn settings() -> ConsoleSettings {
    ConsoleSettings {
        fast_interval: FAST,
        slow_interval: SLOW,
        news_limit: 10,
        symbols: ["dogecoin", "cardano", "stellar", "polygon"]
            .into_iter()
            .map(String::from)
            .collect(),
        logout_timeout: Duration::from_secs(2),
    }
}

/// Let spawned tasks run without advancing a paused clock.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
