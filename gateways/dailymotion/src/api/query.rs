//! Query parameters shared by the list endpoints.

use videos_sdk::{CollectionOptions, GatewayError, Result};

/// Field projection sent with every video request.
///
/// The duplicates are harmless and kept so the request matches what the service has always
/// been sent.
pub const FIELDS: &str = "id,title,owner,owner.screenname,owner.url,created_time,duration,description,id,views_total,title,url,private,thumbnail_url";

/// Query for one page of a list endpoint.
///
/// Building a query is pure: the same options, token and page size always give the same query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page index.
    pub page: u32,
    pub limit: u32,
    pub fields: Option<&'static str>,
    pub search: Option<String>,
}

impl ListQuery {
    /// Builds the query for a page of a collection.
    ///
    /// The page is taken from the continuation token when there is one, and is 1 otherwise.
    /// A non-empty `q` option becomes the `search` parameter. No other option is forwarded, so
    /// a playlist's `id` never reaches the query string.
    pub fn from_options(
        options: &CollectionOptions,
        more_token: Option<&str>,
        limit: u32,
    ) -> Result<Self> {
        let page = match more_token.filter(|token| !token.is_empty()) {
            Some(token) => parse_more_token(token)?,
            None => 1,
        };
        let search = options.get("q").filter(|q| !q.is_empty()).cloned();
        Ok(Self {
            page,
            limit,
            fields: None,
            search,
        })
    }

    /// Requests the video field projection.
    pub fn with_video_fields(mut self) -> Self {
        self.fields = Some(FIELDS);
        self
    }

    /// The continuation token for the page after this one, if the service reported one.
    ///
    /// Paging stops at the last page a token can name.
    pub fn next_token(&self, has_more: bool) -> Option<String> {
        if !has_more {
            return None;
        }
        self.page
            .checked_add(1)
            .filter(|&page| is_page(page))
            .map(|page| page.to_string())
    }

    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string())];
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(fields) = self.fields {
            pairs.push(("fields", fields.to_string()));
        }
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }
}

/// Pages a continuation token can name.
fn is_page(page: u32) -> bool {
    (1..u32::MAX).contains(&page)
}

fn parse_more_token(token: &str) -> Result<u32> {
    match token.parse::<u32>() {
        Ok(page) if is_page(page) => Ok(page),
        _ => Err(GatewayError::InvalidMoreToken(token.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn options(pairs: &[(&str, &str)]) -> CollectionOptions {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn first_page_without_token() {
        for opts in [
            options(&[]),
            options(&[("id", "x6hynp")]),
            options(&[("q", "surf")]),
        ] {
            let query = ListQuery::from_options(&opts, None, 30).unwrap();
            assert_eq!(query.page, 1);
            assert_eq!(query.limit, 30);
        }
    }

    #[test]
    fn token_selects_the_page() {
        for page in [1u32, 2, 17, 4096] {
            let token = page.to_string();
            let query = ListQuery::from_options(&options(&[]), Some(&token), 10).unwrap();
            assert_eq!(query.page, page);
        }
    }

    #[test]
    fn empty_token_is_treated_as_absent() {
        let query = ListQuery::from_options(&options(&[]), Some(""), 10).unwrap();
        assert_eq!(query.page, 1);
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        for token in ["0", "-1", "next", "2.5", "4294967295", "4294967296"] {
            let err = ListQuery::from_options(&options(&[]), Some(token), 10).unwrap_err();
            assert!(
                matches!(&err, GatewayError::InvalidMoreToken(t) if t == token),
                "{token}: {err:?}"
            );
        }
    }

    #[test]
    fn search_comes_from_q_only() {
        let query =
            ListQuery::from_options(&options(&[("q", "surf"), ("id", "x6hynp")]), None, 10)
                .unwrap();
        assert_eq!(query.search.as_deref(), Some("surf"));
        assert!(query.pairs().iter().all(|(k, _)| *k != "id"));

        let query = ListQuery::from_options(&options(&[("q", "")]), None, 10).unwrap();
        assert_eq!(query.search, None);
    }

    #[test]
    fn pairs_include_projection_when_requested() {
        let query = ListQuery::from_options(&options(&[("q", "surf")]), Some("3"), 12)
            .unwrap()
            .with_video_fields();
        assert_eq!(
            query.pairs(),
            vec![
                ("page", "3".to_string()),
                ("search", "surf".to_string()),
                ("fields", FIELDS.to_string()),
                ("limit", "12".to_string()),
            ]
        );

        let bare = ListQuery::from_options(&options(&[]), None, 12).unwrap();
        assert_eq!(
            bare.pairs(),
            vec![("page", "1".to_string()), ("limit", "12".to_string())]
        );
    }

    #[test]
    fn next_token_is_the_following_page() {
        let query = ListQuery::from_options(&options(&[]), Some("4"), 10).unwrap();
        assert_eq!(query.next_token(true).as_deref(), Some("5"));
        assert_eq!(query.next_token(false), None);
    }

    #[test]
    fn paging_stops_at_the_last_nameable_page() {
        let last = (u32::MAX - 1).to_string();
        let query = ListQuery::from_options(&options(&[]), Some(&last), 10).unwrap();
        assert_eq!(query.next_token(true), None);

        let before_last = (u32::MAX - 2).to_string();
        let query = ListQuery::from_options(&options(&[]), Some(&before_last), 10).unwrap();
        let next = query.next_token(true).unwrap();
        assert_eq!(next, last);
        assert!(ListQuery::from_options(&options(&[]), Some(&next), 10).is_ok());
    }
}
