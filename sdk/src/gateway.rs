//! The contract every video gateway implements.

use crate::error::Result;
use crate::models::{Capabilities, CollectionMethod, CollectionOptions, Section, Video, VideosPage};
use crate::oauth::OAuthProvider;
use std::future::Future;

/// A video service, as seen by the host.
///
/// Implementations hold the host-supplied access token and settings, and translate each
/// operation into at most one request against the service. They keep no mutable state between
/// calls, so a single gateway may be shared across concurrent tasks.
pub trait Gateway: Send + Sync {
    /// The OAuth2 provider description for this service.
    type OAuthProvider: OAuthProvider;

    /// Short machine name, e.g. `dailymotion`.
    fn handle(&self) -> &'static str;

    /// Display name, e.g. `Dailymotion`.
    fn name(&self) -> &'static str;

    /// Path of the gateway's icon asset, relative to the host's asset root.
    fn icon_path(&self) -> &'static str;

    fn oauth_provider_handle(&self) -> &'static str;

    fn oauth_provider_name(&self) -> &'static str;

    /// Where developers register an application to obtain OAuth credentials.
    fn oauth_provider_api_console_url(&self) -> &'static str;

    /// Scopes the host should request during authorization.
    fn oauth_scope(&self) -> &'static [&'static str];

    fn create_oauth_provider(&self) -> Self::OAuthProvider;

    /// Template the host renders for the gateway's settings page.
    fn settings_template_path(&self) -> &'static str;

    /// The collections the host can offer for browsing, grouped into sections.
    fn explorer_sections(&self) -> impl Future<Output = Result<Vec<Section>>> + Send;

    /// Fetches one video.
    ///
    /// Fails with [`GatewayError::NotFound`](crate::GatewayError::NotFound) when the service
    /// has no video with that id.
    fn video_by_id(&self, id: &str) -> impl Future<Output = Result<Video>> + Send;

    /// Fetches one page of a collection.
    ///
    /// `more_token` is `None` for the first page, and otherwise the
    /// [`VideosPage::more_token`] of the previous page.
    fn list_videos(
        &self,
        method: CollectionMethod,
        options: &CollectionOptions,
        more_token: Option<&str>,
    ) -> impl Future<Output = Result<VideosPage>> + Send;

    /// Pulls the service's video id out of a shared URL, if the URL belongs to this service.
    fn extract_video_id_from_url(&self, url: &str) -> Option<String>;

    /// URL of the embeddable player for a video. Protocol-relative.
    fn embed_url(&self, id: &str) -> String;

    fn supported_capabilities(&self) -> Capabilities;

    /// Fetches the video a shared URL points at.
    ///
    /// Returns `Ok(None)` when the URL does not belong to this service.
    fn video_by_url(&self, url: &str) -> impl Future<Output = Result<Option<Video>>> + Send {
        let id = self.extract_video_id_from_url(url);
        async move {
            match id {
                Some(id) => self.video_by_id(&id).await.map(Some),
                None => Ok(None),
            }
        }
    }
}
