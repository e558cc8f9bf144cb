//! Fetch-and-apply for each server-backed feed.
//!
//! Shared by the polling loops, the initial load after login and the
//! post-command refreshes, so every path goes through the same sequence
//! admission.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::error_log::ErrorLog;
use super::scheduler::PollJob;
use super::slot::{Admission, Ticket};
use super::store::StatusStore;
use crate::error::Result;
use crate::port::{BotApi, Feed};

#[derive(Clone)]
pub struct StoreSync {
    api: Arc<dyn BotApi>,
    store: Arc<StatusStore>,
    error_log: Arc<ErrorLog>,
    news_limit: usize,
}

impl StoreSync {
    #[must_use]
    pub fn new(
        api: Arc<dyn BotApi>,
        store: Arc<StatusStore>,
        error_log: Arc<ErrorLog>,
        news_limit: usize,
    ) -> Self {
        Self {
            api,
            store,
            error_log,
            news_limit,
        }
    }

    pub async fn refresh_status(&self) -> Result<Admission> {
        self.refresh(Feed::Status).await
    }

    pub async fn refresh_trades(&self) -> Result<Admission> {
        self.refresh(Feed::Trades).await
    }

    pub async fn refresh_news(&self) -> Result<Admission> {
        self.refresh(Feed::News).await
    }

    pub async fn refresh(&self, feed: Feed) -> Result<Admission> {
        self.refresh_within(feed, self.generation()).await
    }

    /// Refresh `feed` on behalf of `generation`.
    ///
    /// Nothing is fetched once that generation has been torn down, and a
    /// response landing after teardown is dropped.
    pub async fn refresh_within(&self, feed: Feed, generation: u64) -> Result<Admission> {
        if !self.store.generation().is_current(generation) {
            debug!(%feed, generation, "Skipped refresh for torn-down session");
            return Ok(Admission::Cancelled { generation });
        }
        match feed {
            Feed::Status => {
                let ticket = scoped(self.store.status_ticket(), generation);
                let snapshot = self.api.status().await?;
                Ok(log_admission(feed, self.store.apply_status(ticket, snapshot)))
            }
            Feed::Trades => {
                let ticket = scoped(self.store.trades_ticket(), generation);
                let trades = self.api.trades().await?;
                Ok(log_admission(feed, self.store.apply_trades(ticket, trades)))
            }
            Feed::News => {
                let ticket = scoped(self.store.news_ticket(), generation);
                let news = self.api.news(self.news_limit).await?;
                Ok(log_admission(feed, self.store.apply_news(ticket, news)))
            }
            Feed::Errors => self.error_log.refresh_within(generation).await,
        }
    }

    /// The generation requests issued now belong to.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.store.generation().current()
    }

    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.store.generation().is_current(generation)
    }

    /// Invalidate everything in flight and forget all server state.
    /// Returns the new generation.
    pub fn end_session(&self) -> u64 {
        let generation = self.store.generation().advance();
        self.store.reset();
        self.error_log.clear();
        generation
    }

    #[must_use]
    pub fn store(&self) -> &Arc<StatusStore> {
        &self.store
    }

    #[must_use]
    pub fn error_log(&self) -> &Arc<ErrorLog> {
        &self.error_log
    }

    /// A poll job refreshing `feed` through this sync.
    #[must_use]
    pub fn job(&self, feed: Feed) -> Arc<dyn PollJob> {
        Arc::new(FeedPoll {
            sync: self.clone(),
            feed,
        })
    }
}

fn scoped(ticket: Ticket, generation: u64) -> Ticket {
    Ticket {
        generation,
        ..ticket
    }
}

fn log_admission(feed: Feed, admission: Admission) -> Admission {
    match admission {
        Admission::Applied => debug!(%feed, "Applied response"),
        Admission::Stale { seq, latest } => {
            debug!(%feed, seq, latest, "Dropped stale response");
        }
        Admission::Cancelled { generation } => {
            debug!(%feed, generation, "Dropped response from torn-down session");
        }
    }
    admission
}

struct FeedPoll {
    sync: StoreSync,
    feed: Feed,
}

#[async_trait]
impl PollJob for FeedPoll {
    fn feed(&self) -> Feed {
        self.feed
    }

    async fn run(&self) -> Result<()> {
        self.sync.refresh(self.feed).await.map(|_| ())
    }
}
