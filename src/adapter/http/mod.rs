//! reqwest-backed [`crate::port::BotApi`] implementation.

mod client;
mod dto;

pub use client::HttpBotApi;
