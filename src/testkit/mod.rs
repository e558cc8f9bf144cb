//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`api`] - Scriptable in-memory [`BotApi`](crate::port::BotApi):
//!   call counts, injected failures, per-endpoint delays, scripted status
//!   responses.
//! - [`store`] - [`MemoryTokenStore`].
//! - [`notifier`] - [`RecordingNotifier`] for asserting on console events.
//! - [`fixtures`] - Builders for domain values.

pub mod api;
pub mod fixtures;
pub mod notifier;
pub mod store;

pub use api::{Endpoint, FakeBotApi};
pub use notifier::RecordingNotifier;
pub use store::MemoryTokenStore;
