//! Authentication and session management

pub mod jwt;
pub mod models;
pub mod session;

pub use jwt::{decode, Claims, ADMIN_CLAIM};
pub use models::{Credentials, SessionState};
pub use session::{SessionManager, AUTH_PATH, SESSION_KEY};
