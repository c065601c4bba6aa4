use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, KeySchemaElement, KeyType, Projection,
    ProjectionType, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client as DynamoDbClient;
use post_storage::post::PostAttribute;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub const TEST_TIMESTAMP_INDEX_NAME: &str = "TimestampIndex";

/// Helper for creating and managing DynamoDB tables in tests
///
/// Creates every table used by the posts API.
pub struct DynamoDbTestSetup {
    client: Arc<DynamoDbClient>,
    pub posts_table_name: String,
}

impl DynamoDbTestSetup {
    pub async fn new(client: Arc<DynamoDbClient>) -> Self {
        let posts_table_name = Self::create_posts_table(&client).await;

        Self {
            client,
            posts_table_name,
        }
    }

    fn key(name: PostAttribute, key_type: KeyType) -> KeySchemaElement {
        KeySchemaElement::builder()
            .attribute_name(name.to_string())
            .key_type(key_type)
            .build()
            .unwrap()
    }

    fn attribute(name: PostAttribute, attribute_type: ScalarAttributeType) -> AttributeDefinition {
        AttributeDefinition::builder()
            .attribute_name(name.to_string())
            .attribute_type(attribute_type)
            .build()
            .unwrap()
    }

    /// Creates a test posts table with a unique name and the timestamp GSI
    async fn create_posts_table(client: &DynamoDbClient) -> String {
        let table_name = format!("test-posts-{}", Uuid::new_v4());

        client
            .create_table()
            .table_name(&table_name)
            .attribute_definitions(Self::attribute(PostAttribute::PostId, ScalarAttributeType::S))
            .attribute_definitions(Self::attribute(PostAttribute::Dummy, ScalarAttributeType::S))
            .attribute_definitions(Self::attribute(
                PostAttribute::Timestamp,
                ScalarAttributeType::N,
            ))
            .key_schema(Self::key(PostAttribute::PostId, KeyType::Hash))
            .global_secondary_indexes(
                GlobalSecondaryIndex::builder()
                    .index_name(TEST_TIMESTAMP_INDEX_NAME)
                    .key_schema(Self::key(PostAttribute::Dummy, KeyType::Hash))
                    .key_schema(Self::key(PostAttribute::Timestamp, KeyType::Range))
                    .projection(
                        Projection::builder()
                            .projection_type(ProjectionType::All)
                            .build(),
                    )
                    .build()
                    .unwrap(),
            )
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await
            .expect("Failed to create test table");

        // Wait for table to be ready
        tokio::time::sleep(Duration::from_millis(100)).await;

        table_name
    }
}

impl Drop for DynamoDbTestSetup {
    fn drop(&mut self) {
        let client = self.client.clone();
        let posts_table_name = self.posts_table_name.clone();

        let handle = tokio::runtime::Handle::try_current();
        if let Ok(handle) = handle {
            handle.spawn(async move {
                let _ = client
                    .delete_table()
                    .table_name(&posts_table_name)
                    .send()
                    .await;
            });
        }
    }
}
