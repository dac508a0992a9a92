//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote auth API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every request path is joined onto
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the login endpoint
    #[serde(default = "default_auth_path")]
    pub auth_path: String,

    /// Request header carrying the stored token
    #[serde(default = "default_token_header")]
    pub token_header: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3900/api".to_string()
}

fn default_auth_path() -> String {
    "/auth".to_string()
}

fn default_token_header() -> String {
    "x-auth-token".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_path: default_auth_path(),
            token_header: default_token_header(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Persistent token storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage file; defaults to the platform data directory
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Key the session token is stored under
    #[serde(default = "default_session_key")]
    pub session_key: String,
}

fn default_session_key() -> String {
    "token".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            session_key: default_session_key(),
        }
    }
}

impl StorageConfig {
    /// Resolve the storage file location
    pub fn resolved_path(&self) -> PathBuf {
        match &self.path {
            Some(path) => path.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("authsession")
                .join("storage.json"),
        }
    }
}
