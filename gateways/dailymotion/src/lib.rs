//! Dailymotion gateway for the videos SDK.
//!
//! [`DailymotionGateway`] implements [`videos_sdk::Gateway`] on top of the Dailymotion REST
//! API, and [`oauth::Dailymotion`] describes Dailymotion's OAuth2 provider.
//!
//! The gateway is handed an access token and settings by the host. It never refreshes or
//! stores the token, and each operation sends at most one request.
//!
//! # Example
//!
//! ```rust,no_run
//! use oauth2::AccessToken;
//! use videos_dailymotion::{DailymotionGateway, GatewaySettings};
//! use videos_sdk::{CollectionMethod, CollectionOptions, Gateway};
//!
//! # async fn example() -> videos_sdk::Result<()> {
//! let gateway = DailymotionGateway::new(
//!     AccessToken::new("access-token".to_string()),
//!     GatewaySettings::default(),
//!     reqwest::Client::new(),
//! );
//!
//! let page = gateway
//!     .list_videos(CollectionMethod::Uploads, &CollectionOptions::new(), None)
//!     .await?;
//! for video in &page.videos {
//!     println!("{} ({}s)", video.title(), video.duration_seconds());
//! }
//! if let Some(token) = page.more_token {
//!     let next = gateway
//!         .list_videos(CollectionMethod::Uploads, &CollectionOptions::new(), Some(&token))
//!         .await?;
//!     println!("{} more", next.videos.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod gateway;
pub mod oauth;

pub use gateway::{DailymotionGateway, GatewaySettings, embed_url, extract_video_id};
