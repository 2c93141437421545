//! Walking every page of a collection.

use crate::error::Result;
use crate::gateway::Gateway;
use crate::models::{CollectionMethod, CollectionOptions, Video};
use tokio_stream::Stream;

/// Returns a stream over every video in a collection.
///
/// Pages are fetched lazily: the next request is only sent once the consumer has drained the
/// current page. The stream ends after the page that reports no continuation, or right after
/// yielding the first error.
pub fn all_videos<'a, G>(
    gateway: &'a G,
    method: CollectionMethod,
    options: &'a CollectionOptions,
) -> impl Stream<Item = Result<Video>> + Send + 'a
where
    G: Gateway,
{
    async_stream::try_stream! {
        let mut more_token: Option<String> = None;
        loop {
            let page = gateway
                .list_videos(method, options, more_token.as_deref())
                .await?;
            for video in page.videos {
                yield video;
            }
            match page.more_token {
                Some(token) if page.more => more_token = Some(token),
                _ => break,
            }
        }
    }
}
