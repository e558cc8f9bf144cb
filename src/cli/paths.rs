//! Path utilities for helmsman.
//!
//! Client state lives under `~/.helmsman/`:
//! - `~/.helmsman/session.token` - the persisted session token

use std::path::PathBuf;

/// Returns the helmsman home directory (`~/.helmsman/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".helmsman")
}

/// Returns the default token file path (`~/.helmsman/session.token`).
pub fn default_token_file() -> PathBuf {
    home_dir().join("session.token")
}
