//! reqwest-backed transport

use async_trait::async_trait;
use std::sync::RwLock;
use std::time::Duration;

use super::{Response, Transport};
use crate::config::ApiConfig;
use crate::error::{Error, Result};

/// HTTP client for the remote auth API
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token_header: String,
    jwt: RwLock<Option<String>>,
}

impl ApiClient {
    /// Build a client primed with whatever token is currently stored
    pub fn new(config: &ApiConfig, jwt: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token_header: config.token_header.clone(),
            jwt: RwLock::new(jwt),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a request path
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Token currently attached to requests
    pub fn jwt(&self) -> Option<String> {
        self.jwt.read().ok().and_then(|jwt| jwt.clone())
    }
}

#[async_trait]
impl Transport for ApiClient {
    async fn post(&self, path: &str, body: serde_json::Value) -> Result<Response> {
        let url = self.url(path);
        let mut request = self.client.post(&url).json(&body);
        if let Some(jwt) = self.jwt() {
            request = request.header(self.token_header.as_str(), jwt);
        }

        tracing::debug!("POST {}", url);
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::debug!("POST {} failed with {}", url, status);
            return Err(Error::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(Response {
            data: parse_token_body(&text)?,
        })
    }

    fn set_jwt(&self, jwt: Option<String>) {
        if let Ok(mut current) = self.jwt.write() {
            *current = jwt;
        }
    }
}

/// Extract the token from a response body. A JSON string literal is
/// unquoted; any other body is the token verbatim.
fn parse_token_body(body: &str) -> Result<String> {
    let token = if body.trim_start().starts_with('"') {
        serde_json::from_str::<String>(body)
            .map_err(|e| Error::MalformedResponse(e.to_string()))?
    } else {
        body.to_string()
    };

    if token.trim().is_empty() {
        return Err(Error::MalformedResponse("empty token".to_string()));
    }
    Ok(token)
}
