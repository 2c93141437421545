//! Dailymotion REST API (v3.0) plumbing.
//!
//! Every call the gateway makes is an authenticated `GET` against
//! `https://api.dailymotion.com/`. List endpoints share one query shape ([`query::ListQuery`]):
//! a 1-based `page`, a `limit`, an optional field projection and an optional `search`. Their
//! responses share one envelope ([`types::ListResponse`]) whose `has_more` flag drives
//! pagination.
//!
//! See: <https://developers.dailymotion.com/api/>

pub mod client;
pub mod query;
pub mod types;

pub use client::ApiClient;
pub use query::{FIELDS, ListQuery};
