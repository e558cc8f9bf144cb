//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │       Application       │
//!                    │  session · scheduler ·  │
//!     ┌──────────────┤  store · dispatcher     ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ BotApi  │            │ TokenStore  │              │ Notifier  │
//! │ (HTTP)  │            │   (file)    │              │ (log/tty) │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! - [`BotApi`] - The remote bot's REST contract
//! - [`TokenStore`] - Durable storage for the session token
//! - [`Notifier`] - The single event/error reporting channel

mod bot_api;
mod notifier;
mod token_store;

pub use bot_api::BotApi;
pub use notifier::{ConsoleEvent, Feed, Notifier};
pub use token_store::TokenStore;
