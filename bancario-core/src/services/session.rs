//! Shared session state
//!
//! One `SessionState` is created per context and handed to every service as
//! `Arc<SessionState>`. Every mutation is written through to the
//! `SessionStore`; a failed write is logged and the in-memory state still
//! changes, so logout always takes effect locally.

use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::domain::result::Result;
use crate::domain::{Session, User};
use crate::ports::SessionStore;

pub struct SessionState {
    current: RwLock<Option<Session>>,
    store: Arc<dyn SessionStore>,
}

impl SessionState {
    /// Empty session backed by `store`; nothing is read from it
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            current: RwLock::new(None),
            store,
        }
    }

    /// Session restored from whatever `store` holds
    pub fn restore(store: Arc<dyn SessionStore>) -> Result<Self> {
        let session = store.load()?;
        debug!(restored = session.is_some(), "session restored");
        Ok(Self {
            current: RwLock::new(session),
            store,
        })
    }

    /// Replace the current session and persist it
    pub fn set(&self, session: Session) {
        if let Err(e) = self.store.save(&session) {
            warn!(error = %e, "failed to persist session");
        }
        if let Ok(mut slot) = self.current.write() {
            *slot = Some(session);
        }
    }

    /// Drop token and user. Idempotent.
    pub fn logout(&self) {
        if let Ok(mut slot) = self.current.write() {
            *slot = None;
        }
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear stored session");
        }
    }

    /// Token present locally; the server may still reject it
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.current
            .read()
            .ok()
            .and_then(|s| s.as_ref().map(|s| s.token.clone()))
            .filter(|t| !t.is_empty())
    }

    pub fn current_user(&self) -> Option<User> {
        self.current
            .read()
            .ok()
            .and_then(|s| s.as_ref().and_then(|s| s.user.clone()))
    }

    pub fn current_user_id(&self) -> Option<String> {
        self.current
            .read()
            .ok()
            .and_then(|s| s.as_ref().and_then(|s| s.user_id().map(str::to_string)))
    }

    pub fn is_admin(&self) -> bool {
        self.current
            .read()
            .ok()
            .map(|s| s.as_ref().map(Session::is_admin).unwrap_or(false))
            .unwrap_or(false)
    }
}
