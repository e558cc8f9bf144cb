//! Sequence-admitted value slot.
//!
//! A fetch takes a [`Ticket`] before it goes on the wire and hands it back
//! with the response. The slot admits a response only if its sequence number
//! is newer than the last one applied and its generation is still current,
//! so an earlier request can never overwrite state set by a later one no
//! matter the arrival order.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use super::generation::Generation;

/// Issued per request; orders responses for admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub seq: u64,
    pub generation: u64,
}

/// Outcome of offering a response to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Applied,
    /// A newer response was already applied.
    Stale { seq: u64, latest: u64 },
    /// The request's generation was torn down.
    Cancelled { generation: u64 },
}

impl Admission {
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

#[derive(Debug)]
struct SlotState<T> {
    applied_seq: u64,
    value: Option<T>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct SequencedSlot<T> {
    next_seq: AtomicU64,
    generation: Generation,
    state: Mutex<SlotState<T>>,
}

impl<T: Clone> SequencedSlot<T> {
    #[must_use]
    pub fn new(generation: Generation) -> Self {
        Self {
            next_seq: AtomicU64::new(0),
            generation,
            state: Mutex::new(SlotState {
                applied_seq: 0,
                value: None,
                updated_at: None,
            }),
        }
    }

    /// Reserve the next sequence number for a request about to be sent.
    pub fn ticket(&self) -> Ticket {
        Ticket {
            seq: self.next_seq.fetch_add(1, Ordering::SeqCst) + 1,
            generation: self.generation.current(),
        }
    }

    /// The teardown marker this slot admits against.
    #[must_use]
    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    /// Offer a response. The value replaces the slot content wholesale or
    /// not at all.
    pub fn apply(&self, ticket: Ticket, value: T) -> Admission {
        let mut state = self.state.lock();
        if !self.generation.is_current(ticket.generation) {
            return Admission::Cancelled {
                generation: ticket.generation,
            };
        }
        if ticket.seq <= state.applied_seq {
            return Admission::Stale {
                seq: ticket.seq,
                latest: state.applied_seq,
            };
        }
        state.applied_seq = ticket.seq;
        state.value = Some(value);
        state.updated_at = Some(Utc::now());
        Admission::Applied
    }

    #[must_use]
    pub fn get(&self) -> Option<T> {
        self.state.lock().value.clone()
    }

    /// Read the value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        f(self.state.lock().value.as_ref())
    }

    #[must_use]
    pub fn applied_seq(&self) -> u64 {
        self.state.lock().applied_seq
    }

    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.state.lock().updated_at
    }

    /// Drop the content. Sequence numbers keep increasing.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.value = None;
        state.updated_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_ticket_wins_regardless_of_arrival() {
        let slot = SequencedSlot::new(Generation::new());
        let first = slot.ticket();
        let second = slot.ticket();

        assert_eq!(slot.apply(second, "second"), Admission::Applied);
        assert_eq!(
            slot.apply(first, "first"),
            Admission::Stale { seq: 1, latest: 2 }
        );
        assert_eq!(slot.get(), Some("second"));
    }

    #[test]
    fn in_order_arrivals_all_apply() {
        let slot = SequencedSlot::new(Generation::new());
        let first = slot.ticket();
        let second = slot.ticket();

        assert!(slot.apply(first, 1).is_applied());
        assert!(slot.apply(second, 2).is_applied());
        assert_eq!(slot.get(), Some(2));
        assert_eq!(slot.applied_seq(), 2);
    }

    #[test]
    fn replayed_ticket_is_stale() {
        let slot = SequencedSlot::new(Generation::new());
        let ticket = slot.ticket();
        assert!(slot.apply(ticket, 1).is_applied());
        assert!(!slot.apply(ticket, 2).is_applied());
        assert_eq!(slot.get(), Some(1));
    }

    #[test]
    fn torn_down_generation_is_cancelled_even_if_newest() {
        let generation = Generation::new();
        let slot = SequencedSlot::new(generation.clone());
        let ticket = slot.ticket();

        generation.advance();

        assert_eq!(
            slot.apply(ticket, 7),
            Admission::Cancelled { generation: 0 }
        );
        assert!(slot.get().is_none());
        assert_eq!(slot.applied_seq(), 0);
    }

    #[test]
    fn clear_keeps_sequence_ordering() {
        let slot = SequencedSlot::new(Generation::new());
        let old = slot.ticket();
        let new = slot.ticket();
        assert!(slot.apply(new, 2).is_applied());

        slot.clear();
        assert!(slot.get().is_none());
        assert!(!slot.apply(old, 1).is_applied());
    }
}
