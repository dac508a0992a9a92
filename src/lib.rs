//! authsession - client-side session management
//!
//! Logs a user in against a remote auth endpoint, keeps the returned token
//! in a persistent key-value store, and decodes it to identify the user.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod storage;

pub use auth::{Claims, SessionManager, SessionState};
pub use config::Config;
pub use error::Error;
