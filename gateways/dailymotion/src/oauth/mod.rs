//! Dailymotion as an OAuth2 provider.
//!
//! [`Dailymotion`] is the stateless description the host needs to run the authorization-code
//! flow: endpoints, scopes, error detection and how to read the userinfo response.
//! [`OAuthFlow`] drives that flow with the `oauth2` crate, and [`authenticate`] runs it end to
//! end in the user's browser for command-line use.

mod flow;
mod redirect;

pub use flow::{OAuthCredentials, OAuthEndpoints, OAuthFlow, authenticate};

use serde_json::{Map, Value};
use videos_sdk::{GatewayError, OAuthProvider, ResourceOwner, Result};

pub const AUTHORIZE_URL: &str = "https://www.dailymotion.com/oauth/authorize";
pub const TOKEN_URL: &str = "https://api.dailymotion.com/oauth/token";
pub const RESOURCE_OWNER_URL: &str = "https://api.dailymotion.com/me/?fields=id,screenname,email";

/// Scopes requested unless the host asks for others.
pub const DEFAULT_SCOPES: &[&str] = &["email", "userinfo"];

#[derive(Debug, Clone, Copy, Default)]
pub struct Dailymotion;

impl OAuthProvider for Dailymotion {
    type Owner = DailymotionResourceOwner;

    fn base_authorization_url(&self) -> &'static str {
        AUTHORIZE_URL
    }

    fn base_access_token_url(&self) -> &'static str {
        TOKEN_URL
    }

    fn resource_owner_details_url(&self) -> &'static str {
        RESOURCE_OWNER_URL
    }

    fn default_scopes(&self) -> &'static [&'static str] {
        DEFAULT_SCOPES
    }

    fn scope_separator(&self) -> &'static str {
        " "
    }

    /// Dailymotion reports errors either as `{"error": "invalid_grant"}` or as
    /// `{"error": {"code": 4, "message": "..."}}`. Both become the same `(code, message)` pair,
    /// with code 0 when none is given.
    fn check_response(&self, body: &Value) -> Result<()> {
        match body.get("error") {
            Some(error) if !is_blank(error) => Err(normalize_error(error)),
            _ => Ok(()),
        }
    }

    fn create_resource_owner(&self, body: Value) -> DailymotionResourceOwner {
        DailymotionResourceOwner::new(body)
    }
}

fn normalize_error(error: &Value) -> GatewayError {
    let (code, message) = match error {
        Value::Object(fields) => (
            fields.get("code").and_then(Value::as_i64).unwrap_or(0),
            fields
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        ),
        Value::String(message) => (0, message.clone()),
        other => (0, other.to_string()),
    };
    GatewayError::IdentityProvider { code, message }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty() || s == "0",
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// The authenticated Dailymotion user, from `me/?fields=id,screenname,email`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailymotionResourceOwner {
    response: Map<String, Value>,
}

impl DailymotionResourceOwner {
    /// Wraps a userinfo response. Anything other than a JSON object yields an owner with no
    /// fields.
    pub fn new(response: Value) -> Self {
        let response = match response {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };
        Self { response }
    }

    fn field(&self, key: &str) -> Option<&str> {
        self.response.get(key).and_then(Value::as_str)
    }
}

impl ResourceOwner for DailymotionResourceOwner {
    fn id(&self) -> Option<&str> {
        self.field("id")
    }

    fn name(&self) -> Option<&str> {
        self.field("screenname")
    }

    fn email(&self) -> Option<&str> {
        self.field("email")
    }

    fn to_map(&self) -> &Map<String, Value> {
        &self.response
    }
}
