//! JWT payload decoding

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Claim marking a user as an administrator
pub const ADMIN_CLAIM: &str = "isAdmin";

/// Claims decoded from a token payload
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    /// Raw claim value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Subject (user ID)
    pub fn sub(&self) -> Option<&str> {
        self.get_str("sub").or_else(|| self.get_str("_id"))
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn email(&self) -> Option<&str> {
        self.get_str("email")
    }

    /// True only when the admin claim is the boolean `true`
    pub fn is_admin(&self) -> bool {
        matches!(self.get(ADMIN_CLAIM), Some(Value::Bool(true)))
    }

    /// Issued at. Informational only.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp("iat")
    }

    /// Expiration time. Informational only, never enforced.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp("exp")
    }

    fn timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        self.get(name)
            .and_then(Value::as_i64)
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Decode the claims of a token without verifying its signature.
///
/// The token must have three segments, a parseable header and a JSON object
/// payload. Signature, expiry and audience are not checked.
pub fn decode(token: &str) -> Result<Claims> {
    let data = jsonwebtoken::dangerous::insecure_decode::<Claims>(token)?;
    Ok(data.claims)
}
