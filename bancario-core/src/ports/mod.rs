//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. Services depend
//! only on these traits, not on concrete implementations.

mod http_client;
mod session_store;

pub use http_client::{ApiRequest, HttpClient, Method};
pub use session_store::SessionStore;
