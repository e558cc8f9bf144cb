//! Authentication session lifecycle.
//!
//! The session gates every other component. Its liveness is published on a
//! `watch` channel so polling loops can stop as soon as it ends.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{AuthError, Error};
use crate::port::{BotApi, TokenStore};

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    started_at: DateTime<Utc>,
    /// True when restored from storage rather than issued by a login.
    restored: bool,
}

impl Session {
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub const fn is_restored(&self) -> bool {
        self.restored
    }
}

pub struct SessionManager {
    api: Arc<dyn BotApi>,
    tokens: Arc<dyn TokenStore>,
    session: RwLock<Option<Session>>,
    liveness: watch::Sender<bool>,
    logout_timeout: Duration,
}

impl SessionManager {
    #[must_use]
    pub fn new(api: Arc<dyn BotApi>, tokens: Arc<dyn TokenStore>, logout_timeout: Duration) -> Self {
        let (liveness, _) = watch::channel(false);
        Self {
            api,
            tokens,
            session: RwLock::new(None),
            liveness,
            logout_timeout,
        }
    }

    /// Adopt a persisted token, if any. The session is optimistically
    /// treated as active; the first 401 on an authenticated call demotes it.
    pub fn restore(&self) -> bool {
        let token = match self.tokens.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted session token");
                None
            }
        };
        let Some(token) = token else {
            debug!("No persisted session");
            return false;
        };
        self.activate(Session {
            token,
            started_at: Utc::now(),
            restored: true,
        });
        info!("Restored persisted session");
        true
    }

    /// Exchange the password for a token and persist it.
    pub async fn login(&self, password: &str) -> Result<Session, AuthError> {
        if password.is_empty() {
            return Err(AuthError::MissingPassword);
        }

        let token = match self.api.login(password).await {
            Ok(token) if token.trim().is_empty() => return Err(AuthError::InvalidCredentials),
            Ok(token) => token,
            Err(e) if e.is_unauthorized() => {
                warn!("Login rejected");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(AuthError::Unavailable(e.to_string())),
        };

        self.tokens
            .save(&token)
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        let session = Session {
            token,
            started_at: Utc::now(),
            restored: false,
        };
        self.activate(session.clone());
        info!("Logged in");
        Ok(session)
    }

    /// End the session. Local state is cleared first and unconditionally;
    /// the server is notified afterwards on a best-effort basis, bounded by
    /// the logout timeout. Returns whether the server acknowledged.
    pub async fn logout(&self) -> bool {
        let Some(session) = self.deactivate() else {
            return true;
        };

        match tokio::time::timeout(self.logout_timeout, self.api.logout(&session.token)).await {
            Ok(Ok(())) => {
                info!("Logged out");
                true
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Logout notification failed; session cleared locally");
                false
            }
            Err(_) => {
                let e = Error::Timeout(self.logout_timeout);
                warn!(error = %e, "Logout notification failed; session cleared locally");
                false
            }
        }
    }

    /// Demote the session without notifying the server, e.g. after the
    /// bot rejected the token.
    pub fn invalidate(&self) {
        if self.deactivate().is_some() {
            warn!("Session invalidated");
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.read().is_some()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.session.read().as_ref().map(|s| s.token.clone())
    }

    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.session.read().clone()
    }

    /// Liveness updates; `true` while a session is active.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.liveness.subscribe()
    }

    fn activate(&self, session: Session) {
        *self.session.write() = Some(session);
        self.liveness.send_replace(true);
    }

    fn deactivate(&self) -> Option<Session> {
        let previous = self.session.write().take();
        if let Err(e) = self.tokens.clear() {
            warn!(error = %e, "Failed to remove persisted session token");
        }
        self.liveness.send_replace(false);
        previous
    }
}
