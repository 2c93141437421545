//! Response shapes of the Dailymotion endpoints the gateway reads.

use jiff::Timestamp;
use serde::Deserialize;

/// The envelope around every list endpoint (`me/videos`, `videos`, `me/playlists`, ...).
///
/// Items are kept as raw JSON so the untransformed payload can be carried along with each
/// parsed video.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T = serde_json::Value> {
    /// Whether another page exists after this one.
    #[serde(default)]
    pub has_more: bool,
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
}

/// A `video` object, restricted to the fields in [`FIELDS`](super::FIELDS).
///
/// Sub-object fields requested with a dotted name (`owner.screenname`) come back as flat keys
/// with that same dotted name.
///
/// See: <https://developers.dailymotion.com/api/#video-fields>
#[derive(Debug, Deserialize)]
pub struct VideoItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "owner.screenname")]
    pub owner_screenname: String,
    #[serde(rename = "owner.url")]
    pub owner_url: String,
    /// Unix timestamp, in seconds.
    #[serde(with = "jiff::fmt::serde::timestamp::second::required")]
    pub created_time: Timestamp,
    /// Length of the video, in seconds.
    pub duration: u64,
    /// Absent for videos whose statistics are hidden.
    #[serde(default)]
    pub views_total: Option<u64>,
    pub url: String,
    pub private: bool,
    pub thumbnail_url: String,
}

/// A `playlist` object as listed by `me/playlists` with the default projection.
#[derive(Debug, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
}
