//! Host-side contract for video gateways.
//!
//! A gateway lets the host browse and fetch videos from one third-party video service. Every
//! gateway implements [`Gateway`], and turns the service's responses into the normalized
//! [`Video`], [`Collection`] and [`Section`] values defined here. Authentication happens through
//! the service's OAuth2 endpoints, which a gateway describes through [`OAuthProvider`].
//!
//! The host owns the access token and the paging settings. Gateways receive both explicitly
//! when they are constructed and never store or refresh tokens themselves.
//!
//! # Pagination
//!
//! List operations return a [`VideosPage`]. When [`VideosPage::more`] is set, the page carries
//! an opaque continuation token that is passed back verbatim to fetch the next page. The token
//! format belongs to the gateway; hosts must not interpret it. [`paging::all_videos`] walks
//! every page of a collection for callers that want a flat stream.

pub mod error;
pub mod gateway;
pub mod models;
pub mod oauth;
pub mod paging;

pub use error::{GatewayError, Result};
pub use gateway::Gateway;
pub use models::{
    Capabilities, Collection, CollectionMethod, CollectionOptions, Section, Video, VideoBuilder,
    VideoBuilderError, VideosPage,
};
pub use oauth::{OAuthProvider, ResourceOwner};
