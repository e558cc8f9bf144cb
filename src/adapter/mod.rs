//! Implementations of ports (hexagonal adapters).

pub mod http;
pub mod notifier;
pub mod token_file;
