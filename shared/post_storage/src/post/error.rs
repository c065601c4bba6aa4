//! Error types for post storage operations

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::{put_item::PutItemError, query::QueryError};
use thiserror::Error;

/// Result type alias for storage operations
pub type PostStorageResult<T> = Result<T, PostStorageError>;

/// Storage error types for post operations
#[derive(Debug, Error)]
pub enum PostStorageError {
    /// Failed to insert post into `DynamoDB`
    #[error("Failed to insert post into DynamoDB: {0:?}")]
    DynamoDbPutError(#[from] SdkError<PutItemError>),

    /// Failed to query posts from `DynamoDB`
    #[error("Failed to query posts from DynamoDB: {0:?}")]
    DynamoDbQueryError(#[from] SdkError<QueryError>),

    /// Failed to convert between a post and a `DynamoDB` item
    #[error("Failed to parse post: {0}")]
    SerializationError(String),
}

impl From<serde_dynamo::Error> for PostStorageError {
    fn from(err: serde_dynamo::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
