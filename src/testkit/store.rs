use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::port::TokenStore;

/// Token store held in memory. Can be told to fail saves.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
    fail_saves: Mutex<bool>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let store = Self::default();
        *store.token.lock() = Some(token.to_string());
        store
    }

    pub fn stored(&self) -> Option<String> {
        self.token.lock().clone()
    }

    pub fn fail_saves(&self) {
        *self.fail_saves.lock() = true;
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.stored())
    }

    fn save(&self, token: &str) -> Result<()> {
        if *self.fail_saves.lock() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only token store",
            )));
        }
        *self.token.lock() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.token.lock().take();
        Ok(())
    }
}
