use std::sync::Arc;
use std::time::Duration;

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, BillingMode, GlobalSecondaryIndex, KeySchemaElement,
    KeyType, Projection, ProjectionType, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client as DynamoDbClient;
use pretty_assertions::assert_eq;
use post_storage::post::{PostAttribute, PostCreateRequest, PostStorage, RECENT_POSTS_LIMIT};
use tokio::time::sleep;
use uuid::Uuid;

/// Test configuration for LocalStack
const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";
const TEST_REGION: &str = "us-east-1";
const TEST_TIMESTAMP_INDEX_NAME: &str = "TimestampIndex";

/// Test context that automatically cleans up the table on drop
struct TestContext {
    storage: PostStorage,
    table_name: String,
    dynamodb_client: Arc<DynamoDbClient>,
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let client = self.dynamodb_client.clone();
        let table = self.table_name.clone();

        let handle = tokio::runtime::Handle::try_current();
        if let Ok(handle) = handle {
            handle.spawn(async move {
                let _ = client.delete_table().table_name(&table).send().await;
            });
        }
    }
}

fn key(name: PostAttribute, key_type: KeyType) -> KeySchemaElement {
    KeySchemaElement::builder()
        .attribute_name(name.to_string())
        .key_type(key_type)
        .build()
        .expect("Failed to build key schema")
}

fn attribute(name: PostAttribute, attribute_type: ScalarAttributeType) -> AttributeDefinition {
    AttributeDefinition::builder()
        .attribute_name(name.to_string())
        .attribute_type(attribute_type)
        .build()
        .expect("Failed to build attribute definition")
}

/// Creates a test setup with a unique posts table
async fn setup_test() -> TestContext {
    let table_name = format!("test-posts-{}", Uuid::new_v4());

    let credentials = Credentials::from_keys("test", "test", None);
    let config = aws_config::defaults(BehaviorVersion::latest())
        .endpoint_url(LOCALSTACK_ENDPOINT)
        .region(Region::new(TEST_REGION))
        .credentials_provider(credentials)
        .load()
        .await;

    let dynamodb_client = Arc::new(DynamoDbClient::new(&config));

    dynamodb_client
        .create_table()
        .table_name(&table_name)
        .billing_mode(BillingMode::PayPerRequest)
        .key_schema(key(PostAttribute::PostId, KeyType::Hash))
        .attribute_definitions(attribute(PostAttribute::PostId, ScalarAttributeType::S))
        .attribute_definitions(attribute(PostAttribute::Dummy, ScalarAttributeType::S))
        .attribute_definitions(attribute(PostAttribute::Timestamp, ScalarAttributeType::N))
        .global_secondary_indexes(
            GlobalSecondaryIndex::builder()
                .index_name(TEST_TIMESTAMP_INDEX_NAME)
                .key_schema(key(PostAttribute::Dummy, KeyType::Hash))
                .key_schema(key(PostAttribute::Timestamp, KeyType::Range))
                .projection(
                    Projection::builder()
                        .projection_type(ProjectionType::All)
                        .build(),
                )
                .build()
                .expect("Failed to build GSI"),
        )
        .send()
        .await
        .expect("Failed to create test table");

    sleep(Duration::from_millis(100)).await;

    let storage = PostStorage::new(
        dynamodb_client.clone(),
        table_name.clone(),
        TEST_TIMESTAMP_INDEX_NAME.to_string(),
    );

    TestContext {
        storage,
        table_name,
        dynamodb_client,
    }
}

fn request(content: &str) -> PostCreateRequest {
    PostCreateRequest {
        content: content.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_applies_defaults() {
    let context = setup_test().await;

    let post = context
        .storage
        .create(request("First gallop of the day"))
        .await
        .expect("Failed to create post");

    assert_eq!(post.author, "Anonymous Unicorn");
    assert_eq!(post.unicorn_color, "rainbow");
    assert_eq!(post.likes, 0);
    assert_eq!(post.image_url, None);
    assert_eq!(post.post_id.len(), 36);
    assert!(post.timestamp > 1_600_000_000_000, "timestamp is in milliseconds");
}

#[tokio::test]
async fn test_create_keeps_provided_fields() {
    let context = setup_test().await;

    let post = context
        .storage
        .create(PostCreateRequest {
            content: "Look at my mane".to_string(),
            author: Some("Stardust".to_string()),
            unicorn_color: Some("Pink".to_string()),
            image_url: Some("https://example.com/mane.png".to_string()),
        })
        .await
        .expect("Failed to create post");

    assert_eq!(post.author, "Stardust");
    assert_eq!(post.unicorn_color, "Pink");
    assert_eq!(post.image_url.as_deref(), Some("https://example.com/mane.png"));
}

#[tokio::test]
async fn test_list_recent_returns_newest_first() {
    let context = setup_test().await;

    for content in ["one", "two", "three"] {
        context
            .storage
            .create(request(content))
            .await
            .expect("Failed to create post");
        // Distinct millisecond timestamps
        sleep(Duration::from_millis(5)).await;
    }

    let posts = context
        .storage
        .list_recent()
        .await
        .expect("Failed to list posts");

    let contents: Vec<&str> = posts.iter().map(|p| p.content.as_str()).collect();
    assert_eq!(contents, vec!["three", "two", "one"]);
}

#[tokio::test]
async fn test_list_recent_tolerates_foreign_items() {
    let context = setup_test().await;

    context
        .storage
        .create(request("well formed"))
        .await
        .expect("Failed to create post");

    // Written by a client that stored a null author and a float timestamp
    context
        .dynamodb_client
        .put_item()
        .table_name(&context.table_name)
        .item("postId", AttributeValue::S("foreign".to_string()))
        .item("author", AttributeValue::Null(true))
        .item("content", AttributeValue::S("hello".to_string()))
        .item("timestamp", AttributeValue::N("1.5".to_string()))
        .item("dummy", AttributeValue::S("POST".to_string()))
        .send()
        .await
        .expect("Failed to put foreign item");

    let posts = context
        .storage
        .list_recent()
        .await
        .expect("Failed to list posts");

    assert_eq!(posts.len(), 2);
    let foreign = posts
        .iter()
        .find(|p| p.post_id == "foreign")
        .expect("Foreign post missing");
    assert_eq!(foreign.author, "");
    assert_eq!(foreign.timestamp, 1);
    assert_eq!(foreign.unicorn_color, "rainbow");
    assert_eq!(posts[0].content, "well formed");
}

#[tokio::test]
async fn test_list_recent_on_empty_table() {
    let context = setup_test().await;

    let posts = context
        .storage
        .list_recent()
        .await
        .expect("Failed to list posts");

    assert!(posts.is_empty());
}

#[tokio::test]
async fn test_list_recent_is_capped() {
    let context = setup_test().await;

    for i in 0..(RECENT_POSTS_LIMIT + 5) {
        context
            .storage
            .create(request(&format!("post {i}")))
            .await
            .expect("Failed to create post");
    }

    let posts = context
        .storage
        .list_recent()
        .await
        .expect("Failed to list posts");

    assert_eq!(posts.len(), RECENT_POSTS_LIMIT as usize);
}

#[tokio::test]
async fn test_list_recent_missing_table_fails() {
    let context = setup_test().await;
    let storage = PostStorage::new(
        context.dynamodb_client.clone(),
        "does-not-exist".to_string(),
        TEST_TIMESTAMP_INDEX_NAME.to_string(),
    );

    assert!(storage.list_recent().await.is_err());
}
