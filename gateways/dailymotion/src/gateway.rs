//! The Dailymotion implementation of [`Gateway`].

use crate::api::types::{ListResponse, Playlist, VideoItem};
use crate::api::{ApiClient, FIELDS, ListQuery, client::API_URL};
use crate::oauth::{DEFAULT_SCOPES, Dailymotion};
use oauth2::AccessToken;
use regex::Regex;
use reqwest::Url;
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::instrument;
use videos_sdk::{
    Capabilities, Collection, CollectionMethod, CollectionOptions, Gateway, GatewayError, Result,
    Section, Video, VideosPage,
};

pub const HANDLE: &str = "dailymotion";
pub const NAME: &str = "Dailymotion";

/// Videos per page when the host does not configure a page size.
pub const DEFAULT_VIDEOS_PER_PAGE: u32 = 30;

static VIDEO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(www\.)?dailymotion\.com/video/([A-Za-z0-9]+)")
        .expect("video URL pattern is valid")
});

/// Host-supplied settings for the gateway.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    /// Page size of every list request.
    pub videos_per_page: u32,
    /// Root of the REST API. Only changed to point at a stand-in server.
    pub api_url: Url,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            videos_per_page: DEFAULT_VIDEOS_PER_PAGE,
            api_url: Url::parse(API_URL).expect("API_URL is a valid URL"),
        }
    }
}

/// Browses and fetches videos of the Dailymotion account the access token belongs to.
#[derive(Debug, Clone)]
pub struct DailymotionGateway {
    api: ApiClient,
    videos_per_page: u32,
}

impl DailymotionGateway {
    pub fn new(token: AccessToken, settings: GatewaySettings, http: reqwest::Client) -> Self {
        Self {
            api: ApiClient::new(http, settings.api_url, token),
            videos_per_page: settings.videos_per_page,
        }
    }

    /// Lists the playlists of the authenticated account, as `(id, title)` pairs.
    ///
    /// Only the first page is read.
    async fn playlists(&self) -> Result<Vec<(String, String)>> {
        let query = ListQuery::from_options(&CollectionOptions::new(), None, self.videos_per_page)?;
        let response: ListResponse<Playlist> =
            self.api.get(&["me", "playlists"], &query.pairs()).await?;
        tracing::debug!(returned_items = response.list.len(), "fetched playlists");
        Ok(response
            .list
            .into_iter()
            .map(|playlist| (playlist.id, playlist.name))
            .collect())
    }

    /// Fetches one page of a video list endpoint.
    async fn videos_page(
        &self,
        path: &[&str],
        options: &CollectionOptions,
        more_token: Option<&str>,
    ) -> Result<VideosPage> {
        let query = ListQuery::from_options(options, more_token, self.videos_per_page)?
            .with_video_fields();
        let response: ListResponse = self.api.get(path, &query.pairs()).await?;

        let videos = response
            .list
            .into_iter()
            .map(parse_video)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            ?path,
            page = query.page,
            returned_items = videos.len(),
            has_more = response.has_more,
            "fetched videos"
        );

        Ok(match query.next_token(response.has_more) {
            Some(token) => VideosPage::with_more(videos, token),
            None => VideosPage::last(videos),
        })
    }
}

impl Gateway for DailymotionGateway {
    type OAuthProvider = Dailymotion;

    fn handle(&self) -> &'static str {
        HANDLE
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn icon_path(&self) -> &'static str {
        "dailymotion/icon.svg"
    }

    fn oauth_provider_handle(&self) -> &'static str {
        HANDLE
    }

    fn oauth_provider_name(&self) -> &'static str {
        NAME
    }

    fn oauth_provider_api_console_url(&self) -> &'static str {
        "http://www.dailymotion.com/settings/developer"
    }

    fn oauth_scope(&self) -> &'static [&'static str] {
        DEFAULT_SCOPES
    }

    fn create_oauth_provider(&self) -> Dailymotion {
        Dailymotion
    }

    fn settings_template_path(&self) -> &'static str {
        "videos-dailymotion/_gateway"
    }

    /// The Library section, followed by a Playlists section when the account has playlists.
    #[instrument(skip(self))]
    async fn explorer_sections(&self) -> Result<Vec<Section>> {
        let mut sections = vec![Section::new(
            "Library",
            vec![
                Collection::new("Uploads", CollectionMethod::Uploads),
                Collection::new("Likes", CollectionMethod::Likes),
                Collection::new("History", CollectionMethod::History),
            ],
        )];

        let playlists: Vec<Collection> = self
            .playlists()
            .await?
            .into_iter()
            .map(|(id, title)| {
                Collection::new(title, CollectionMethod::Playlist).with_option("id", id)
            })
            .collect();
        if !playlists.is_empty() {
            sections.push(Section::new("Playlists", playlists));
        }

        Ok(sections)
    }

    #[instrument(skip(self))]
    async fn video_by_id(&self, id: &str) -> Result<Video> {
        let query = [("fields", FIELDS.to_string())];
        let data: Option<serde_json::Value> = match self.api.get(&["video", id], &query).await {
            Ok(data) => data,
            Err(e) if e.status() == Some(404) => None,
            Err(e) => return Err(e),
        };

        match data {
            Some(data) if !is_empty(&data) => parse_video(data),
            _ => {
                tracing::debug!(id, "no video returned");
                Err(GatewayError::NotFound(id.to_string()))
            }
        }
    }

    #[instrument(skip(self, options))]
    async fn list_videos(
        &self,
        method: CollectionMethod,
        options: &CollectionOptions,
        more_token: Option<&str>,
    ) -> Result<VideosPage> {
        match method {
            CollectionMethod::Uploads => {
                self.videos_page(&["me", "videos"], options, more_token).await
            }
            CollectionMethod::Likes => {
                self.videos_page(&["me", "likes"], options, more_token).await
            }
            CollectionMethod::History => {
                self.videos_page(&["me", "history"], options, more_token).await
            }
            CollectionMethod::Playlist => {
                let id = options
                    .get("id")
                    .filter(|id| !id.is_empty())
                    .ok_or(GatewayError::MissingOption("id"))?;
                self.videos_page(&["playlist", id.as_str(), "videos"], options, more_token)
                    .await
            }
            CollectionMethod::Search => self.videos_page(&["videos"], options, more_token).await,
        }
    }

    fn extract_video_id_from_url(&self, url: &str) -> Option<String> {
        extract_video_id(url)
    }

    fn embed_url(&self, id: &str) -> String {
        embed_url(id)
    }

    fn supported_capabilities(&self) -> Capabilities {
        Capabilities { search: true }
    }
}

/// Pulls the video id out of a `dailymotion.com/video/...` URL.
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_URL
        .captures(url)
        .and_then(|captures| captures.get(2))
        .map(|id| id.as_str().to_string())
}

/// Protocol-relative URL of the embeddable player.
pub fn embed_url(id: &str) -> String {
    format!("//www.dailymotion.com/embed/video/{id}")
}

/// Builds a [`Video`] from one item of a Dailymotion response.
///
/// The item is kept verbatim as the video's raw payload. An item missing any documented field
/// fails the whole parse.
pub fn parse_video(raw: serde_json::Value) -> Result<Video> {
    let item = VideoItem::deserialize(&raw)
        .map_err(|e| GatewayError::api(format!("parse Dailymotion video: {e}")))?;

    let video = Video::builder()
        .id(item.id)
        .title(item.title)
        .description(item.description.unwrap_or_default())
        .author_name(item.owner_screenname)
        .author_url(item.owner_url)
        .date(item.created_time)
        .duration_seconds(item.duration)
        .plays(item.views_total.unwrap_or(0))
        .url(item.url)
        .private(item.private)
        .thumbnail_source(item.thumbnail_url)
        .raw(raw)
        .gateway_handle(HANDLE)
        .gateway_name(NAME)
        .build()?;
    Ok(video)
}

fn is_empty(data: &serde_json::Value) -> bool {
    match data {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        serde_json::Value::Array(list) => list.is_empty(),
        _ => false,
    }
}
