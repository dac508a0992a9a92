//! Session management

use crate::auth::jwt::{self, Claims};
use crate::auth::models::{Credentials, SessionState};
use crate::config::Config;
use crate::error::Result;
use crate::http::{ApiClient, Transport};
use crate::storage::{FileStore, TokenStore};

/// Default storage key for the session token
pub const SESSION_KEY: &str = "token";

/// Default path of the login endpoint
pub const AUTH_PATH: &str = "/auth";

/// Owns the single stored session token.
///
/// Presence of a token is the only "logged in" signal. Tokens are never
/// validated locally; there is no expired state.
pub struct SessionManager<S = FileStore, T = ApiClient> {
    store: S,
    transport: T,
    session_key: String,
    auth_path: String,
}

impl SessionManager<FileStore, ApiClient> {
    /// Build storage, read the stored token, prime the HTTP client with it,
    /// then hand both to the manager
    pub fn bootstrap(config: &Config) -> Result<Self> {
        let store = FileStore::new(config.storage.resolved_path());
        let jwt = match store.get(&config.storage.session_key) {
            Ok(jwt) => jwt,
            Err(e) => {
                tracing::warn!("Ignoring unreadable session token: {}", e);
                None
            }
        };
        tracing::debug!(
            "Bootstrapping session from {} ({})",
            store.path().display(),
            if jwt.is_some() { "token present" } else { "no token" }
        );

        let transport = ApiClient::new(&config.api, jwt)?;

        Ok(SessionManager::new(store, transport)
            .with_session_key(&config.storage.session_key)
            .with_auth_path(&config.api.auth_path))
    }
}

impl<S: TokenStore, T: Transport> SessionManager<S, T> {
    /// Create a manager with the default session key and auth path
    pub fn new(store: S, transport: T) -> Self {
        Self {
            store,
            transport,
            session_key: SESSION_KEY.to_string(),
            auth_path: AUTH_PATH.to_string(),
        }
    }

    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = key.into();
        self
    }

    pub fn with_auth_path(mut self, path: impl Into<String>) -> Self {
        self.auth_path = path.into();
        self
    }

    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Exchange credentials for a token and store it.
    ///
    /// Transport failures propagate unchanged and leave the store untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let credentials = Credentials::new(email, password);
        tracing::info!("Logging in as {}", credentials.email);

        let response = self
            .transport
            .post(&self.auth_path, serde_json::to_value(&credentials)?)
            .await?;

        self.write_token(&response.data)?;
        tracing::info!("Logged in as {}", credentials.email);
        Ok(())
    }

    /// Remove the stored token. A no-op when there is none.
    pub fn logout(&self) -> Result<()> {
        self.store.remove(&self.session_key)?;
        self.transport.set_jwt(None);
        tracing::info!("Logged out");
        Ok(())
    }

    /// Store a token obtained out-of-band, without verifying it
    pub fn login_with_jwt(&self, jwt: &str) -> Result<()> {
        self.write_token(jwt)?;
        tracing::info!("Stored externally issued token");
        Ok(())
    }

    /// Claims of the stored token, `None` when there is no token or it
    /// cannot be decoded
    pub fn current_user(&self) -> Option<Claims> {
        let jwt = self.jwt()?;
        match jwt::decode(&jwt) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::debug!("Stored token could not be decoded: {}", e);
                None
            }
        }
    }

    /// The raw stored token
    pub fn jwt(&self) -> Option<String> {
        match self.store.get(&self.session_key) {
            Ok(jwt) => jwt,
            Err(e) => {
                tracing::warn!("Failed to read session token: {}", e);
                None
            }
        }
    }

    /// Whether the current user carries the admin claim; false when anonymous
    pub fn is_admin(&self) -> bool {
        self.current_user()
            .map(|claims| claims.is_admin())
            .unwrap_or(false)
    }

    pub fn state(&self) -> SessionState {
        if self.jwt().is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    fn write_token(&self, jwt: &str) -> Result<()> {
        self.store.set(&self.session_key, jwt)?;
        self.transport.set_jwt(Some(jwt.to_string()));
        tracing::debug!("Session token written under '{}'", self.session_key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::http::Response;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::Value;
    use std::sync::Mutex;

    /// Transport answering every POST with a fixed outcome
    #[derive(Default)]
    struct MockTransport {
        token: Option<String>,
        status: Option<u16>,
        requests: Mutex<Vec<(String, Value)>>,
        primed: Mutex<Option<String>>,
    }

    impl MockTransport {
        fn returning(token: &str) -> Self {
            Self {
                token: Some(token.to_string()),
                ..Self::default()
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                status: Some(status),
                ..Self::default()
            }
        }

        fn primed(&self) -> Option<String> {
            self.primed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn post(&self, path: &str, body: Value) -> Result<Response> {
            self.requests.lock().unwrap().push((path.to_string(), body));
            if let Some(status) = self.status {
                return Err(Error::Status {
                    status,
                    body: "Invalid email or password.".to_string(),
                });
            }
            match &self.token {
                Some(token) => Ok(Response {
                    data: token.clone(),
                }),
                None => Err(Error::MalformedResponse("empty token".to_string())),
            }
        }

        fn set_jwt(&self, jwt: Option<String>) {
            *self.primed.lock().unwrap() = jwt;
        }
    }

    fn manager(transport: MockTransport) -> SessionManager<MemoryStore, MockTransport> {
        SessionManager::new(MemoryStore::new(), transport)
    }

    fn token_for(claims: Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"issuer-secret"),
        )
        .expect("Failed to create token")
    }

    #[tokio::test]
    async fn test_login_stores_returned_token() {
        let session = manager(MockTransport::returning("tok123"));
        assert_eq!(session.state(), SessionState::Anonymous);

        session.login("a@b.com", "pw").await.expect("Login failed");

        assert_eq!(session.jwt().as_deref(), Some("tok123"));
        assert_eq!(session.state(), SessionState::Authenticated);
        assert_eq!(session.transport().primed().as_deref(), Some("tok123"));
    }

    #[tokio::test]
    async fn test_login_posts_credentials_to_auth_path() {
        let session = manager(MockTransport::returning("tok123"));
        session.login("a@b.com", "pw").await.unwrap();

        let requests = session.transport().requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "/auth");
        assert_eq!(
            requests[0].1,
            serde_json::json!({ "email": "a@b.com", "password": "pw" })
        );
    }

    #[tokio::test]
    async fn test_login_replaces_previous_token() {
        let session = manager(MockTransport::returning("new-token"));
        session.login_with_jwt("old-token").unwrap();

        session.login("a@b.com", "pw").await.unwrap();
        assert_eq!(session.jwt().as_deref(), Some("new-token"));
    }

    #[tokio::test]
    async fn test_failed_login_propagates_and_keeps_token() {
        let session = manager(MockTransport::failing(400));
        session.login_with_jwt("existing").unwrap();

        let result = session.login("a@b.com", "wrong").await;
        assert!(matches!(result, Err(Error::Status { status: 400, .. })));
        assert_eq!(session.jwt().as_deref(), Some("existing"));
    }

    #[tokio::test]
    async fn test_malformed_response_propagates() {
        let session = manager(MockTransport::default());
        let result = session.login("a@b.com", "pw").await;
        assert!(matches!(result, Err(Error::MalformedResponse(_))));
        assert_eq!(session.jwt(), None);
    }

    #[test]
    fn test_logout_clears_token() {
        let session = manager(MockTransport::default());
        session.login_with_jwt("tok123").unwrap();

        session.logout().unwrap();
        assert_eq!(session.jwt(), None);
        assert_eq!(session.state(), SessionState::Anonymous);
        assert_eq!(session.transport().primed(), None);
    }

    #[test]
    fn test_logout_is_idempotent() {
        let session = manager(MockTransport::default());
        assert!(session.logout().is_ok());
        assert!(session.logout().is_ok());
        assert_eq!(session.jwt(), None);
    }

    #[test]
    fn test_login_with_jwt_round_trip() {
        let session = manager(MockTransport::default());
        session.login_with_jwt("out-of-band").unwrap();
        assert_eq!(session.jwt().as_deref(), Some("out-of-band"));
    }

    #[test]
    fn test_current_user_without_token() {
        let session = manager(MockTransport::default());
        assert!(session.current_user().is_none());
    }

    #[test]
    fn test_current_user_with_invalid_token() {
        let session = manager(MockTransport::default());
        session.login_with_jwt("not-a-jwt").unwrap();
        assert!(session.current_user().is_none());
        // Still authenticated: the token is present, just undecodable
        assert_eq!(session.state(), SessionState::Authenticated);
    }

    #[test]
    fn test_current_user_decodes_claims() {
        let session = manager(MockTransport::default());
        let token = token_for(serde_json::json!({ "_id": "u1", "name": "Alice" }));
        session.login_with_jwt(&token).unwrap();

        let user = session.current_user().expect("Expected a current user");
        assert_eq!(user.sub(), Some("u1"));
        assert_eq!(user.name(), Some("Alice"));
    }

    #[test]
    fn test_current_user_rejects_malformed_structure() {
        let session = manager(MockTransport::default());
        let admin_payload = "eyJpc0FkbWluIjp0cnVlfQ";

        // Two segments only
        session
            .login_with_jwt(&format!("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.{}", admin_payload))
            .unwrap();
        assert!(session.current_user().is_none());
        assert!(!session.is_admin());

        // Garbage header
        session
            .login_with_jwt(&format!("!!!not-a-header.{}.sig", admin_payload))
            .unwrap();
        assert!(session.current_user().is_none());
        assert!(!session.is_admin());
    }

    #[test]
    fn test_is_admin_false_without_token() {
        let session = manager(MockTransport::default());
        assert!(!session.is_admin());
    }

    #[test]
    fn test_is_admin_reads_claim() {
        let session = manager(MockTransport::default());

        session
            .login_with_jwt(&token_for(serde_json::json!({ "isAdmin": true })))
            .unwrap();
        assert!(session.is_admin());

        session
            .login_with_jwt(&token_for(serde_json::json!({ "name": "Bob" })))
            .unwrap();
        assert!(!session.is_admin());

        session.login_with_jwt("garbage").unwrap();
        assert!(!session.is_admin());
    }

    #[test]
    fn test_custom_session_key() {
        let session = manager(MockTransport::default()).with_session_key("auth-token");
        session.login_with_jwt("abc").unwrap();

        assert_eq!(session.store().get("auth-token").unwrap().as_deref(), Some("abc"));
        assert_eq!(session.store().get("token").unwrap(), None);
    }
}
