use parking_lot::Mutex;

use crate::port::{ConsoleEvent, Notifier};

/// Records every event for later assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<ConsoleEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ConsoleEvent> {
        self.events.lock().clone()
    }

    /// Events that would be shown as banners.
    pub fn banners(&self) -> Vec<ConsoleEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.is_banner())
            .cloned()
            .collect()
    }

    pub fn contains(&self, event: &ConsoleEvent) -> bool {
        self.events.lock().contains(event)
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: ConsoleEvent) {
        self.events.lock().push(event);
    }
}
