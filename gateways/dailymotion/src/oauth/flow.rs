use super::{
    AUTHORIZE_URL, DEFAULT_SCOPES, Dailymotion, DailymotionResourceOwner, RESOURCE_OWNER_URL,
    TOKEN_URL, redirect,
};
use eyre::Context;
use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::url::Url;
use oauth2::{
    AccessToken, AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken,
    EndpointNotSet, EndpointSet, RedirectUrl, RequestTokenError, Scope, TokenUrl, reqwest,
};
use serde_json::Value;
use tracing::instrument;
use videos_sdk::{GatewayError, OAuthProvider, Result};

type ConfiguredClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// The application's credentials, as registered in the Dailymotion developer console.
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Where the flow sends its requests. Defaults to Dailymotion's production endpoints.
#[derive(Debug, Clone)]
pub struct OAuthEndpoints {
    pub authorize: String,
    pub token: String,
    pub resource_owner: String,
}

impl Default for OAuthEndpoints {
    fn default() -> Self {
        Self {
            authorize: AUTHORIZE_URL.to_string(),
            token: TOKEN_URL.to_string(),
            resource_owner: RESOURCE_OWNER_URL.to_string(),
        }
    }
}

/// The authorization-code flow against Dailymotion.
///
/// The exchange itself is done by the `oauth2` crate. This type wires in Dailymotion's
/// endpoints and scopes, and turns Dailymotion's error bodies into
/// [`GatewayError::IdentityProvider`].
#[derive(Debug, Clone)]
pub struct OAuthFlow {
    client: ConfiguredClient,
    http: reqwest::Client,
    resource_owner_url: String,
}

impl OAuthFlow {
    /// Sets up the flow against the production endpoints.
    pub fn new(credentials: &OAuthCredentials) -> eyre::Result<Self> {
        Self::with_endpoints(credentials, OAuthEndpoints::default())
    }

    pub fn with_endpoints(
        credentials: &OAuthCredentials,
        endpoints: OAuthEndpoints,
    ) -> eyre::Result<Self> {
        let auth_url = AuthUrl::new(endpoints.authorize).context("parse authorization URL")?;
        let token_url = TokenUrl::new(endpoints.token).context("parse token URL")?;
        let client = BasicClient::new(ClientId::new(credentials.client_id.clone()))
            .set_client_secret(ClientSecret::new(credentials.client_secret.clone()))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url)
            .set_auth_type(AuthType::RequestBody);

        let http = reqwest::ClientBuilder::new()
            // the token endpoint never legitimately redirects
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            client,
            http,
            resource_owner_url: endpoints.resource_owner,
        })
    }

    /// Where Dailymotion sends the user back to after authorization.
    ///
    /// Must be set before [`Self::authorize_url`] and [`Self::exchange_code`] when the
    /// application has more than one redirect URI registered.
    pub fn with_redirect_url(mut self, redirect_url: RedirectUrl) -> Self {
        self.client = self.client.set_redirect_uri(redirect_url);
        self
    }

    /// The URL to send the user to, asking for the default scopes.
    ///
    /// Returns the CSRF token the redirect's `state` parameter must match.
    pub fn authorize_url(&self, csrf: CsrfToken) -> (Url, CsrfToken) {
        self.client
            .authorize_url(move || csrf)
            // a single pre-joined scope, using Dailymotion's separator
            .add_scope(Scope::new(Dailymotion.scope_param(DEFAULT_SCOPES)))
            .url()
    }

    /// Exchanges an authorization code for an access token.
    #[instrument(skip_all)]
    pub async fn exchange_code(&self, code: AuthorizationCode) -> Result<BasicTokenResponse> {
        match self.client.exchange_code(code).request_async(&self.http).await {
            Ok(token) => {
                tracing::debug!("exchanged authorization code for access token");
                Ok(token)
            }
            Err(RequestTokenError::ServerResponse(response)) => {
                Err(GatewayError::IdentityProvider {
                    code: 0,
                    message: response.error().to_string(),
                })
            }
            Err(RequestTokenError::Parse(e, body)) => {
                // Dailymotion's object-shaped errors don't fit the standard error response.
                if let Ok(body) = serde_json::from_slice::<Value>(&body) {
                    Dailymotion.check_response(&body)?;
                }
                Err(GatewayError::api(format!("parse token response: {e}")))
            }
            Err(RequestTokenError::Request(e)) => {
                Err(GatewayError::api(format!("send token request: {e}")))
            }
            Err(RequestTokenError::Other(message)) => Err(GatewayError::api(message)),
        }
    }

    /// Fetches the profile of the user the access token belongs to.
    #[instrument(skip_all)]
    pub async fn fetch_resource_owner(
        &self,
        token: &AccessToken,
    ) -> Result<DailymotionResourceOwner> {
        let response = self
            .http
            .get(&self.resource_owner_url)
            .bearer_auth(token.secret())
            .send()
            .await
            .map_err(|e| GatewayError::api(format!("send userinfo request: {e}")))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::api(format!("read userinfo response: {e}")))?;
        let body: Value = match serde_json::from_slice(&bytes) {
            Ok(body) => body,
            Err(e) if status.is_success() => {
                return Err(GatewayError::api(format!(
                    "parse userinfo response as JSON: {e}"
                )));
            }
            Err(_) => {
                return Err(GatewayError::api_status(
                    status.as_u16(),
                    String::from_utf8_lossy(&bytes),
                ));
            }
        };

        Dailymotion.check_response(&body)?;
        if !status.is_success() {
            return Err(GatewayError::api_status(status.as_u16(), body.to_string()));
        }
        Ok(Dailymotion.create_resource_owner(body))
    }
}

/// Runs the whole authorization-code flow in the user's browser.
///
/// A one-shot HTTP server on a random loopback port receives the redirect, so the application
/// must allow `http://127.0.0.1` redirect URIs.
pub async fn authenticate(credentials: &OAuthCredentials) -> eyre::Result<BasicTokenResponse> {
    let csrf = CsrfToken::new_random();
    let (redirect_url, authorization_code) = redirect::listen(csrf.clone())
        .await
        .context("set up redirect endpoint")?;
    let flow = OAuthFlow::new(credentials)?.with_redirect_url(redirect_url);

    let (auth_url, _) = flow.authorize_url(csrf);
    tracing::info!(url = %auth_url, "asking user to authorize access to Dailymotion");
    webbrowser::open(auth_url.as_str()).context("open user's browser")?;

    let code = authorization_code
        .await
        .context("await user authorization code")?;
    flow.exchange_code(code)
        .await
        .context("exchange authorization code for access token")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use oauth2::TokenResponse;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use videos_sdk::ResourceOwner;

    fn credentials() -> OAuthCredentials {
        OAuthCredentials {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
        }
    }

    fn flow(server: &MockServer) -> OAuthFlow {
        OAuthFlow::with_endpoints(
            &credentials(),
            OAuthEndpoints {
                authorize: server.url("/oauth/authorize"),
                token: server.url("/oauth/token"),
                resource_owner: server.url("/me/?fields=id,screenname,email"),
            },
        )
        .unwrap()
    }

    fn identity_error(err: GatewayError) -> (i64, String) {
        match err {
            GatewayError::IdentityProvider { code, message } => (code, message),
            other => panic!("expected identity provider error, got {other:?}"),
        }
    }

    #[test]
    fn authorize_url_carries_scopes_and_state() {
        let flow = OAuthFlow::new(&credentials())
            .unwrap()
            .with_redirect_url(RedirectUrl::new("http://127.0.0.1:8912/".to_string()).unwrap());
        let (url, csrf) = flow.authorize_url(CsrfToken::new("state-123".to_string()));

        assert_eq!(url.host_str(), Some("www.dailymotion.com"));
        assert_eq!(url.path(), "/oauth/authorize");
        assert_eq!(csrf.secret(), "state-123");
        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(params.contains(&("scope".to_string(), "email userinfo".to_string())));
        assert!(params.contains(&("state".to_string(), "state-123".to_string())));
        assert!(params.contains(&("client_id".to_string(), "client-id".to_string())));
        assert!(params.contains(&("response_type".to_string(), "code".to_string())));
        assert!(params.contains(&(
            "redirect_uri".to_string(),
            "http://127.0.0.1:8912/".to_string()
        )));
    }

    #[tokio::test]
    async fn exchanges_code_for_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/oauth/token")
                .body_includes("code=the-code")
                .body_includes("client_secret=client-secret");
            then.status(200).json_body(json!({
                "access_token": "access-abc",
                "token_type": "bearer",
                "expires_in": 36000,
                "refresh_token": "refresh-def",
                "scope": "email userinfo",
            }));
        });

        let token = flow(&server)
            .exchange_code(AuthorizationCode::new("the-code".to_string()))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(token.access_token().secret(), "access-abc");
    }

    #[tokio::test]
    async fn string_token_errors_become_identity_errors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(400).json_body(json!({"error": "invalid_grant"}));
        });

        let err = flow(&server)
            .exchange_code(AuthorizationCode::new("stale".to_string()))
            .await
            .unwrap_err();
        assert_eq!(identity_error(err), (0, "invalid_grant".to_string()));
    }

    #[tokio::test]
    async fn object_token_errors_keep_their_code() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(400)
                .json_body(json!({"error": {"code": 4, "message": "bad scope"}}));
        });

        let err = flow(&server)
            .exchange_code(AuthorizationCode::new("the-code".to_string()))
            .await
            .unwrap_err();
        assert_eq!(identity_error(err), (4, "bad scope".to_string()));
    }

    #[tokio::test]
    async fn fetches_resource_owner() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/me/")
                .query_param("fields", "id,screenname,email")
                .header("authorization", "Bearer access-abc");
            then.status(200).json_body(json!({
                "id": "x1abc",
                "screenname": "Harbour Cam",
                "email": "cam@example.com",
            }));
        });

        let owner = flow(&server)
            .fetch_resource_owner(&AccessToken::new("access-abc".to_string()))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(owner.id(), Some("x1abc"));
        assert_eq!(owner.name(), Some("Harbour Cam"));
        assert_eq!(owner.email(), Some("cam@example.com"));
    }

    #[tokio::test]
    async fn userinfo_errors_become_identity_errors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/me/");
            then.status(401).json_body(json!({
                "error": {"code": 401, "message": "Invalid access token", "type": "invalid_token"}
            }));
        });

        let err = flow(&server)
            .fetch_resource_owner(&AccessToken::new("expired".to_string()))
            .await
            .unwrap_err();
        assert_eq!(identity_error(err), (401, "Invalid access token".to_string()));
    }

    #[tokio::test]
    async fn non_json_userinfo_failures_keep_the_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/me/");
            then.status(502).body("bad gateway");
        });

        let err = flow(&server)
            .fetch_resource_owner(&AccessToken::new("access-abc".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(502));
    }
}
