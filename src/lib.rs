//! Helmsman - operator console for a remote automated trading bot.
//!
//! The bot exposes a REST API; helmsman authenticates against it, keeps a
//! last-known-good view of its status, portfolio, risk, trades, news and
//! errors fresh through independent polling loops, and dispatches operator
//! commands (start, stop, emergency stop, manual trades, strategy updates).
//!
//! # Architecture
//!
//! Hexagonal: the application layer depends only on the ports.
//!
//! - [`domain`] - Wire-compatible value types
//! - [`port`] - [`port::BotApi`], [`port::TokenStore`] and [`port::Notifier`]
//! - [`application`] - Session, polling, sequence-admitted store, commands
//! - [`adapter`] - reqwest client, token file, notifiers
//! - [`cli`] - The `helmsman` command line
//!
//! Every fetch takes a sequence ticket before it is sent; the store applies
//! a response only if no later request's response was applied first and the
//! console has not been torn down since.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use helmsman::adapter::http::HttpBotApi;
//! use helmsman::adapter::notifier::LogNotifier;
//! use helmsman::adapter::token_file::FileTokenStore;
//! use helmsman::application::{Console, ConsoleSettings};
//!
//! # async fn run() -> helmsman::error::Result<()> {
//! let console = Console::new(
//!     ConsoleSettings::default(),
//!     Arc::new(HttpBotApi::new("http://localhost:8000")),
//!     Arc::new(FileTokenStore::new("/tmp/helmsman.token")),
//!     Arc::new(LogNotifier),
//! );
//! console.login("secret").await?;
//! console.commands().emergency_stop().await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
