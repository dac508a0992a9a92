//! HTTP transport used to reach the auth endpoint

mod client;

pub use client::ApiClient;

use async_trait::async_trait;

use crate::error::Result;

/// Body of a successful response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub data: String,
}

/// Request plumbing the session manager delegates network calls to.
///
/// Implementations attach the primed token to outgoing requests. They read
/// the token, they never persist it.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON body to `path`, relative to the transport's base URL
    async fn post(&self, path: &str, body: serde_json::Value) -> Result<Response>;

    /// Prime (or clear) the token attached to outgoing requests
    fn set_jwt(&self, jwt: Option<String>);
}
