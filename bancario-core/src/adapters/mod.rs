//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - reqwest for the HttpClient port
//! - JSON file (or memory) for the SessionStore port

pub mod http;
pub mod session_file;

#[cfg(test)]
pub mod mock_api;

pub use http::ReqwestHttpClient;
pub use session_file::{FileSessionStore, MemorySessionStore};
