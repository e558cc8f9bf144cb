//! Notifier port for console events.
//!
//! All failures of background refreshes and operator commands are routed
//! through one [`Notifier`]. Command failures are banner-worthy; refresh
//! failures are retried on the next tick and only informational.

use std::fmt;

use crate::domain::CommandKind;

/// Server-backed data feeds the console keeps fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    Status,
    Trades,
    News,
    Errors,
}

impl Feed {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Trades => "trades",
            Self::News => "news",
            Self::Errors => "errors",
        }
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events that can trigger notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// A session became active (login or restored token).
    SessionStarted,
    /// The session ended (logout or invalidation).
    SessionEnded,
    /// A fetch failed; the store kept its previous content.
    RefreshFailed { feed: Feed, reason: String },
    /// An operator command completed.
    CommandSucceeded { kind: CommandKind, summary: String },
    /// An operator command failed remotely.
    CommandFailed { kind: CommandKind, reason: String },
    /// A resolve call returned but the re-fetched log still shows the error open.
    ResolveUnconfirmed { id: String },
}

impl ConsoleEvent {
    /// Whether this event should be shown as a dismissible banner.
    #[must_use]
    pub const fn is_banner(&self) -> bool {
        matches!(
            self,
            Self::CommandFailed { .. } | Self::ResolveUnconfirmed { .. }
        )
    }
}

impl fmt::Display for ConsoleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionStarted => f.write_str("session started"),
            Self::SessionEnded => f.write_str("session ended"),
            Self::RefreshFailed { feed, reason } => write!(f, "{feed} refresh failed: {reason}"),
            Self::CommandSucceeded { kind, summary } => write!(f, "{kind}: {summary}"),
            Self::CommandFailed { kind, reason } => write!(f, "{kind} failed: {reason}"),
            Self::ResolveUnconfirmed { id } => {
                write!(f, "error {id} is still open after resolve")
            }
        }
    }
}

/// Trait for event notification handlers.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: ConsoleEvent);
}
