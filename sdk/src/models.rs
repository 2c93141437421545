//! Normalized values exchanged between gateways and the host.

use crate::error::GatewayError;
use derive_builder::Builder;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A single video, normalized across services.
///
/// Videos are only ever produced by a gateway parsing a service response, and are immutable
/// afterwards. The untransformed item the video was parsed from is kept in [`Video::raw`].
#[derive(Debug, Clone, PartialEq, Builder, Serialize)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// The service's identifier for the video. Stable across requests.
    id: String,
    title: String,
    #[builder(default)]
    description: String,
    author_name: String,
    author_url: String,
    /// When the video was created on the service.
    date: Timestamp,
    duration_seconds: u64,
    /// View count. Services that do not report one yield 0.
    #[builder(default)]
    plays: u64,
    /// Canonical URL of the video's page on the service.
    url: String,
    private: bool,
    thumbnail_source: String,
    /// The service's item exactly as it was received.
    raw: serde_json::Value,
    gateway_handle: &'static str,
    gateway_name: &'static str,
}

impl Video {
    pub fn builder() -> VideoBuilder {
        VideoBuilder::default()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn author_name(&self) -> &str {
        &self.author_name
    }

    pub fn author_url(&self) -> &str {
        &self.author_url
    }

    pub fn date(&self) -> Timestamp {
        self.date
    }

    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }

    pub fn plays(&self) -> u64 {
        self.plays
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_private(&self) -> bool {
        self.private
    }

    pub fn thumbnail_source(&self) -> &str {
        &self.thumbnail_source
    }

    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }

    pub fn gateway_handle(&self) -> &'static str {
        self.gateway_handle
    }

    pub fn gateway_name(&self) -> &'static str {
        self.gateway_name
    }
}

impl From<VideoBuilderError> for GatewayError {
    fn from(err: VideoBuilderError) -> Self {
        GatewayError::api(format!("incomplete video: {err}"))
    }
}

/// The fetch operations a [`Collection`] can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionMethod {
    /// Videos uploaded by the authenticated account.
    Uploads,
    /// Videos the authenticated account liked.
    Likes,
    /// Videos the authenticated account watched.
    History,
    /// Videos in one playlist. Needs the `id` option.
    Playlist,
    /// Free-text search. Reads the `q` option.
    Search,
}

impl CollectionMethod {
    pub const ALL: [CollectionMethod; 5] = [
        Self::Uploads,
        Self::Likes,
        Self::History,
        Self::Playlist,
        Self::Search,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uploads => "uploads",
            Self::Likes => "likes",
            Self::History => "history",
            Self::Playlist => "playlist",
            Self::Search => "search",
        }
    }
}

impl fmt::Display for CollectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionMethod {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| GatewayError::UnknownMethod(s.to_string()))
    }
}

/// Method-specific options of a collection, such as a playlist `id` or a search `q`.
pub type CollectionOptions = BTreeMap<String, String>;

/// Describes something the host can list videos from.
///
/// A collection does not hold videos. Pass its method and options to
/// [`Gateway::list_videos`](crate::Gateway::list_videos) to fetch them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Display label.
    pub name: String,
    pub method: CollectionMethod,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: CollectionOptions,
}

impl Collection {
    pub fn new(name: impl Into<String>, method: CollectionMethod) -> Self {
        Self {
            name: name.into(),
            method,
            options: CollectionOptions::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// A named group of collections, for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub collections: Vec<Collection>,
}

impl Section {
    pub fn new(name: impl Into<String>, collections: Vec<Collection>) -> Self {
        Self {
            name: name.into(),
            collections,
        }
    }
}

/// One page of a list operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideosPage {
    /// The videos, in the order the service returned them.
    pub videos: Vec<Video>,
    /// Whether another page exists.
    pub more: bool,
    /// Opaque token for the next page. Present exactly when `more` is set.
    pub more_token: Option<String>,
}

impl VideosPage {
    /// A page followed by another one, reachable through `more_token`.
    pub fn with_more(videos: Vec<Video>, more_token: impl Into<String>) -> Self {
        Self {
            videos,
            more: true,
            more_token: Some(more_token.into()),
        }
    }

    /// The final page.
    pub fn last(videos: Vec<Video>) -> Self {
        Self {
            videos,
            more: false,
            more_token: None,
        }
    }
}

/// Optional features a gateway supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub search: bool,
}
