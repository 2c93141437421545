//! How a gateway describes its OAuth2 provider to the host.
//!
//! The authorization-code exchange itself is generic and handled by an OAuth2 client library.
//! A provider only supplies the configuration points that differ between services: the three
//! endpoint URLs, the scopes and how they are joined, how errors are reported, and how the
//! userinfo response maps onto a [`ResourceOwner`].

use crate::error::Result;
use serde_json::{Map, Value};

pub trait OAuthProvider {
    type Owner: ResourceOwner;

    /// Where the user is sent to grant access.
    fn base_authorization_url(&self) -> &'static str;

    /// Where authorization codes and refresh tokens are exchanged for access tokens.
    fn base_access_token_url(&self) -> &'static str;

    /// Where the authenticated user's profile is fetched from.
    fn resource_owner_details_url(&self) -> &'static str;

    fn default_scopes(&self) -> &'static [&'static str];

    fn scope_separator(&self) -> &'static str;

    /// Fails with [`GatewayError::IdentityProvider`](crate::GatewayError::IdentityProvider) if
    /// a token or userinfo response body reports an error.
    fn check_response(&self, body: &Value) -> Result<()>;

    fn create_resource_owner(&self, body: Value) -> Self::Owner;

    /// Joins `scopes` the way this provider expects them in the `scope` parameter.
    fn scope_param(&self, scopes: &[&str]) -> String {
        scopes.join(self.scope_separator())
    }
}

/// The authenticated end user, as reported by the provider.
pub trait ResourceOwner {
    fn id(&self) -> Option<&str>;

    fn name(&self) -> Option<&str>;

    fn email(&self) -> Option<&str>;

    /// Every field the provider returned.
    fn to_map(&self) -> &Map<String, Value>;
}
