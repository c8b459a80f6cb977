//! Session persistence port

use crate::domain::result::Result;
use crate::domain::Session;

/// Durable storage for the current session
///
/// `load` returns `Ok(None)` both when nothing is stored and when the stored
/// data cannot be parsed; only I/O failures are errors.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>>;

    fn save(&self, session: &Session) -> Result<()>;

    /// Remove any stored session. Succeeds when nothing was stored.
    fn clear(&self) -> Result<()>;
}
