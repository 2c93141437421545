//! Authenticated access to the Dailymotion REST API.

use oauth2::AccessToken;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::instrument;
use videos_sdk::{GatewayError, Result};

/// Base URL of the Dailymotion REST API.
pub const API_URL: &str = "https://api.dailymotion.com/";

/// Version of the REST API the response types are written against.
pub const API_VERSION: &str = "3.0";

/// Sends bearer-authenticated `GET` requests to the Dailymotion API.
///
/// The access token belongs to the host. It is only ever read here: never refreshed, never
/// written anywhere.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: AccessToken,
}

impl ApiClient {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// Timeouts, proxies and TLS settings all come from the given [`reqwest::Client`].
    pub fn new(http: reqwest::Client, base_url: Url, token: AccessToken) -> Self {
        Self {
            http,
            base_url,
            token,
        }
    }

    /// Performs `GET {base_url}/{segments...}` and decodes the JSON body as `T`.
    ///
    /// Each segment is percent-encoded on its own, so a caller-supplied id can never reach
    /// another endpoint.
    ///
    /// # Errors
    ///
    /// Every failure is a [`GatewayError::ApiResponse`]: the request could not be sent, the
    /// status was not a success (the status is kept on the error), or the body did not decode.
    #[instrument(
        skip(self, query),
        fields(base = %self.base_url, api_version = API_VERSION),
        level = tracing::Level::TRACE
    )]
    pub async fn get<T>(&self, segments: &[&str], query: &[(&'static str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let path = segments.join("/");
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                GatewayError::api(format!("API base URL {} cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);

        let response = self
            .http
            .get(url)
            .bearer_auth(self.token.secret())
            .query(query)
            .send()
            .await
            .map_err(|e| GatewayError::api(format!("send request to Dailymotion API: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            tracing::debug!(path, %status, "Dailymotion API request failed");
            return Err(GatewayError::api_status(
                status.as_u16(),
                format!("GET {path} failed with status {status}: {error_text}"),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::api(format!("read response body of {path}: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| GatewayError::api(format!("parse response of {path} as JSON: {e}")))
    }
}
