//! Notifier implementations.

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::port::{ConsoleEvent, Notifier};

/// Writes every event to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: ConsoleEvent) {
        match &event {
            ConsoleEvent::RefreshFailed { feed, reason } => {
                warn!(feed = %feed, reason = %reason, "Refresh failed");
            }
            ConsoleEvent::CommandFailed { kind, reason } => {
                warn!(command = %kind, reason = %reason, "Command failed");
            }
            ConsoleEvent::ResolveUnconfirmed { id } => {
                warn!(error_id = %id, "Resolve not confirmed by server");
            }
            _ => info!(event = %event, "Console event"),
        }
    }
}

/// Forwards events to an unbounded channel, e.g. for an interactive front end.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<ConsoleEvent>,
}

impl ChannelNotifier {
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ConsoleEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, event: ConsoleEvent) {
        // A closed receiver means the front end is gone; nothing to report to.
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::Feed;

    #[test]
    fn channel_notifier_forwards_events() {
        let (notifier, mut rx) = ChannelNotifier::channel();
        notifier.notify(ConsoleEvent::SessionStarted);
        notifier.notify(ConsoleEvent::RefreshFailed {
            feed: Feed::News,
            reason: "timeout".into(),
        });
        assert_eq!(rx.try_recv().unwrap(), ConsoleEvent::SessionStarted);
        assert!(matches!(
            rx.try_recv().unwrap(),
            ConsoleEvent::RefreshFailed { feed: Feed::News, .. }
        ));
    }

    #[test]
    fn channel_notifier_tolerates_closed_receiver() {
        let (notifier, rx) = ChannelNotifier::channel();
        drop(rx);
        notifier.notify(ConsoleEvent::SessionEnded);
    }
}
