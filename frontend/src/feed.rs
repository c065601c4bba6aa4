//! Feed fetching and the feed state machine

use common_types::{Config, Post};
use reqwest::StatusCode;
use thiserror::Error;

/// Message shown for every feed failure
pub const FEED_ERROR_MESSAGE: &str = "Failed to load posts. Please try again later.";

/// Result type alias for client operations
pub type FeedResult<T> = Result<T, FeedError>;

/// Errors raised while talking to the posts API
#[derive(Debug, Error)]
pub enum FeedError {
    /// Network, status or decode failure reported by the HTTP client
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a status the operation does not accept
    #[error("Unexpected response status: {0}")]
    UnexpectedStatus(StatusCode),
}

/// Session state of the feed
///
/// The variants are mutually exclusive, so a failed load never carries stale posts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedState {
    /// A load is in progress
    #[default]
    Loading,
    /// The last load failed with a user-facing message
    Error(String),
    /// Posts in the order the API returned them
    Ready(Vec<Post>),
}

impl FeedState {
    /// State reached once a feed fetch completes
    #[must_use]
    pub fn from_fetch(result: FeedResult<Vec<Post>>) -> Self {
        match result {
            Ok(posts) => Self::Ready(posts),
            Err(err) => {
                tracing::error!("Error fetching posts: {err}");
                Self::Error(FEED_ERROR_MESSAGE.to_string())
            }
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Posts of a ready feed
    #[must_use]
    pub fn posts(&self) -> Option<&[Post]> {
        match self {
            Self::Ready(posts) => Some(posts),
            Self::Loading | Self::Error(_) => None,
        }
    }
}

/// Issues the single read request against `{apiEndpoint}/posts`
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: reqwest::Client,
}

impl FeedFetcher {
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetches the feed; the body is used verbatim, without sorting or filtering.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::Http` on network failure, a non-2xx status, or a body that is not
    /// an array of posts
    pub async fn fetch(&self, config: &Config) -> FeedResult<Vec<Post>> {
        let url = config.posts_url();
        tracing::debug!("Fetching posts from {url}");

        let posts = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Post>>()
            .await?;

        tracing::debug!("Fetched {} posts", posts.len());
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn post(id: &str) -> Post {
        Post {
            post_id: id.to_string(),
            author: "Sparkle".to_string(),
            content: "Hi".to_string(),
            timestamp: 0,
            likes: 0,
            unicorn_color: "pink".to_string(),
            image_url: None,
        }
    }

    #[test]
    fn test_initial_state_is_loading() {
        assert!(FeedState::default().is_loading());
        assert_eq!(FeedState::default().posts(), None);
    }

    #[test]
    fn test_successful_fetch_is_ready() {
        let state = FeedState::from_fetch(Ok(vec![post("a"), post("b")]));

        let ids: Vec<&str> = state
            .posts()
            .unwrap()
            .iter()
            .map(|p| p.post_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_failed_fetch_uses_generic_message() {
        let state = FeedState::from_fetch(Err(FeedError::UnexpectedStatus(
            StatusCode::INTERNAL_SERVER_ERROR,
        )));

        assert_eq!(state, FeedState::Error(FEED_ERROR_MESSAGE.to_string()));
        assert_eq!(state.posts(), None);
    }
}
