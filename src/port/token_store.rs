use crate::error::Result;

/// Durable storage for the session token. Survives process restarts.
pub trait TokenStore: Send + Sync {
    /// Stored token, if any.
    fn load(&self) -> Result<Option<String>>;

    fn save(&self, token: &str) -> Result<()>;

    /// Remove the stored token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;
}
