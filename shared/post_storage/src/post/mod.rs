//! Posts storage module for `DynamoDB` operations

mod error;

use std::sync::Arc;

use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use common_types::{Post, UnicornColor, DEFAULT_AUTHOR};
pub use error::{PostStorageError, PostStorageResult};
use serde::Serialize;
use serde_dynamo::{from_items, to_item};
use strum::Display;

/// Constant partition value of the timestamp index, shared by every post
pub const TIMESTAMP_INDEX_PARTITION: &str = "POST";

/// Maximum number of posts returned by [`PostStorage::list_recent`]
pub const RECENT_POSTS_LIMIT: i32 = 50;

/// `DynamoDB` item for a post, as written by [`PostStorage::create`]
///
/// Reads decode straight into [`Post`], which tolerates items written by other clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    /// Primary key - unique post ID (UUID v4)
    pub post_id: String,
    /// Display name of the author
    pub author: String,
    /// Free text content
    pub content: String,
    /// Creation time in milliseconds, sort key of the timestamp index
    pub timestamp: i64,
    /// Number of likes
    pub likes: u64,
    /// Unicorn colour as submitted
    pub unicorn_color: String,
    /// Optional image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Partition key of the timestamp index, always [`TIMESTAMP_INDEX_PARTITION`]
    pub dummy: String,
}

impl From<PostRecord> for Post {
    fn from(record: PostRecord) -> Self {
        Self {
            post_id: record.post_id,
            author: record.author,
            content: record.content,
            timestamp: record.timestamp,
            likes: record.likes,
            unicorn_color: record.unicorn_color,
            image_url: record.image_url,
        }
    }
}

/// Request to publish a new post
#[derive(Debug, Clone, Default)]
pub struct PostCreateRequest {
    /// Post content
    pub content: String,
    /// Optional author, defaults to [`DEFAULT_AUTHOR`]
    pub author: Option<String>,
    /// Optional unicorn colour, defaults to rainbow
    pub unicorn_color: Option<String>,
    /// Optional image URL
    pub image_url: Option<String>,
}

/// `DynamoDB` attribute names for the posts table
#[derive(Debug, Display)]
#[strum(serialize_all = "camelCase")]
pub enum PostAttribute {
    /// Primary key - unique post ID
    PostId,
    /// Constant partition key of the timestamp index
    Dummy,
    /// Creation timestamp, sort key of the timestamp index
    Timestamp,
}

/// Storage client for post operations
pub struct PostStorage {
    dynamodb_client: Arc<DynamoDbClient>,
    table_name: String,
    timestamp_index_name: String,
}

impl PostStorage {
    /// Creates a new storage instance
    ///
    /// # Arguments
    ///
    /// * `dynamodb_client` - Pre-configured `DynamoDB` client
    /// * `table_name` - `DynamoDB` table name for posts
    /// * `timestamp_index_name` - Name of the GSI ordering posts by timestamp
    #[must_use]
    pub const fn new(
        dynamodb_client: Arc<DynamoDbClient>,
        table_name: String,
        timestamp_index_name: String,
    ) -> Self {
        Self {
            dynamodb_client,
            table_name,
            timestamp_index_name,
        }
    }

    /// Get the most recent posts, newest first, capped at [`RECENT_POSTS_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns `PostStorageError` if the `DynamoDB` query operation fails
    pub async fn list_recent(&self) -> PostStorageResult<Vec<Post>> {
        let response = self
            .dynamodb_client
            .query()
            .table_name(&self.table_name)
            .index_name(&self.timestamp_index_name)
            .key_condition_expression("#dummy = :dummy")
            .expression_attribute_names("#dummy", PostAttribute::Dummy.to_string())
            .expression_attribute_values(
                ":dummy",
                AttributeValue::S(TIMESTAMP_INDEX_PARTITION.to_string()),
            )
            .scan_index_forward(false)
            .limit(RECENT_POSTS_LIMIT)
            .send()
            .await?;

        let items = response.items.unwrap_or_default();
        let posts = from_items::<_, Post>(items)?;
        tracing::debug!("Loaded {} posts from {}", posts.len(), self.table_name);

        Ok(posts)
    }

    /// Create a new post with a generated UUID and the current timestamp
    ///
    /// # Errors
    ///
    /// Returns `PostStorageError` if the `DynamoDB` put operation fails
    pub async fn create(&self, request: PostCreateRequest) -> PostStorageResult<Post> {
        let record = PostRecord {
            post_id: uuid::Uuid::new_v4().to_string(),
            author: request.author.unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            content: request.content,
            timestamp: chrono::Utc::now().timestamp_millis(),
            likes: 0,
            unicorn_color: request
                .unicorn_color
                .unwrap_or_else(|| UnicornColor::Rainbow.to_string()),
            image_url: request.image_url,
            dummy: TIMESTAMP_INDEX_PARTITION.to_string(),
        };

        let item = to_item(&record)?;

        self.dynamodb_client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await?;

        tracing::info!("Created post {}", record.post_id);

        Ok(record.into())
    }
}
