//! Client for `POST {apiEndpoint}/posts`

use common_types::{Config, Post};
use reqwest::StatusCode;
use serde::Serialize;

use crate::feed::{FeedError, FeedResult};

/// Body of a publish request; omitted fields take the API defaults
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unicorn_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PostPublisher {
    client: reqwest::Client,
}

impl PostPublisher {
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Publishes a post and returns it as stored by the API
    ///
    /// # Errors
    ///
    /// Returns `FeedError::UnexpectedStatus` for anything other than `201 Created`, and
    /// `FeedError::Http` on network or decode failure
    pub async fn publish(&self, config: &Config, post: &NewPost) -> FeedResult<Post> {
        let url = config.posts_url();
        tracing::debug!("Publishing post to {url}");

        let response = self.client.post(&url).json(post).send().await?;

        if response.status() != StatusCode::CREATED {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Publish rejected with {status}: {body}");
            return Err(FeedError::UnexpectedStatus(status));
        }

        Ok(response.json::<Post>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_post_omits_unset_fields() {
        let post = NewPost {
            content: "Galloping!".to_string(),
            unicorn_color: Some("pink".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(&post).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "content": "Galloping!", "unicornColor": "pink" })
        );
    }
}
