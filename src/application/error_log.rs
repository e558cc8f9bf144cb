//! Server-reported operational errors.
//!
//! Resolution is a server round trip: [`ErrorLog::resolve`] always re-fetches
//! the list afterwards and reports what the server says, never a locally
//! flipped flag.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::generation::Generation;
use super::slot::{Admission, SequencedSlot, Ticket};
use crate::domain::{CommandKind, SeverityCounts, SystemError};
use crate::error::Result;
use crate::port::{BotApi, ConsoleEvent, Notifier};

/// Result of a resolve round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOutcome {
    pub id: String,
    /// The re-fetched list shows the error resolved.
    pub confirmed: bool,
}

pub struct ErrorLog {
    api: Arc<dyn BotApi>,
    notifier: Arc<dyn Notifier>,
    entries: SequencedSlot<Vec<SystemError>>,
}

impl ErrorLog {
    #[must_use]
    pub fn new(api: Arc<dyn BotApi>, notifier: Arc<dyn Notifier>, generation: Generation) -> Self {
        Self {
            api,
            notifier,
            entries: SequencedSlot::new(generation),
        }
    }

    /// Fetch the current errors and return the log as it stands afterwards.
    ///
    /// If a newer fetch already landed, its content is returned instead.
    pub async fn list(&self) -> Result<Vec<SystemError>> {
        self.refresh().await?;
        Ok(self.entries())
    }

    /// Fetch and offer the result to the log.
    pub async fn refresh(&self) -> Result<Admission> {
        self.refresh_within(self.entries.generation().current())
            .await
    }

    /// Fetch on behalf of `generation`. Nothing is fetched once it has been
    /// torn down.
    pub async fn refresh_within(&self, generation: u64) -> Result<Admission> {
        if !self.entries.generation().is_current(generation) {
            return Ok(Admission::Cancelled { generation });
        }
        let ticket = Ticket {
            generation,
            ..self.entries.ticket()
        };
        let mut errors = self.api.errors().await?;
        errors.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let admission = self.entries.apply(ticket, errors);
        if !admission.is_applied() {
            debug!(?admission, "Dropped error log response");
        }
        Ok(admission)
    }

    /// Ask the server to resolve `id`, then re-fetch.
    ///
    /// The re-fetch happens even when the resolve call fails. A failed
    /// resolve is returned as an error after the re-fetch. If the session
    /// ends while the call is out, the outcome is unconfirmed and nothing
    /// is reported.
    pub async fn resolve(&self, id: &str) -> Result<ResolveOutcome> {
        let generation = self.entries.generation().current();
        let requested = self.api.resolve_error(id).await;
        let refreshed = self.refresh_within(generation).await;

        if !self.entries.generation().is_current(generation) {
            debug!(error_id = %id, "Resolve finished after session ended");
            return requested.map(|()| ResolveOutcome {
                id: id.to_string(),
                confirmed: false,
            });
        }

        if let Err(e) = requested {
            warn!(error_id = %id, error = %e, "Resolve request failed");
            self.notifier.notify(ConsoleEvent::CommandFailed {
                kind: CommandKind::ResolveError,
                reason: e.to_string(),
            });
            return Err(e);
        }
        refreshed?;

        let confirmed = self.is_resolved(id);
        if confirmed {
            info!(error_id = %id, "Error resolved");
        } else {
            warn!(error_id = %id, "Server still reports error as open");
            self.notifier
                .notify(ConsoleEvent::ResolveUnconfirmed { id: id.to_string() });
        }
        Ok(ResolveOutcome {
            id: id.to_string(),
            confirmed,
        })
    }

    /// Current entries, most recent first.
    #[must_use]
    pub fn entries(&self) -> Vec<SystemError> {
        self.entries.get().unwrap_or_default()
    }

    #[must_use]
    pub fn unresolved(&self) -> Vec<SystemError> {
        self.entries
            .with(|e| e.map(|e| e.iter().filter(|e| !e.resolved).cloned().collect()))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn summary(&self) -> SeverityCounts {
        self.entries
            .with(|e| e.map(|e| SeverityCounts::tally(e)).unwrap_or_default())
    }

    #[must_use]
    pub fn is_resolved(&self, id: &str) -> bool {
        self.entries.with(|e| {
            e.is_some_and(|e| e.iter().any(|entry| entry.id == id && entry.resolved))
        })
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl std::fmt::Debug for ErrorLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorLog")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl From<&ErrorLog> for SeverityCounts {
    fn from(log: &ErrorLog) -> Self {
        log.summary()
    }
}
