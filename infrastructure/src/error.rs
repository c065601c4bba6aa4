//! Error types for stack construction and site deployment

use aws_sdk_s3::{error::SdkError, operation::put_object::PutObjectError};
use thiserror::Error;

/// Result type for stack construction
pub type StackResult<T> = Result<T, StackError>;

/// Result type for site deployment
pub type DeployResult<T> = Result<T, DeployError>;

/// A `{{ name }}` placeholder with no substitution value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unresolved placeholder {{{{ {0} }}}}")]
pub struct UnresolvedPlaceholder(pub String);

/// Errors that abort synthesis of a stack
#[derive(Debug, Error)]
pub enum StackError {
    /// A logical id was declared twice
    #[error("Duplicate logical id: {0}")]
    DuplicateId(String),

    /// A resource or output references something that was never declared
    #[error("{resource} references undeclared resource {reference}")]
    UnknownReference {
        /// The referencing resource or output
        resource: String,
        /// The missing logical id
        reference: String,
    },

    /// The dependency graph is not acyclic
    #[error("Dependency cycle between: {}", .0.join(", "))]
    Cycle(Vec<String>),

    /// A substituted file template uses a placeholder it has no value for
    #[error(transparent)]
    Placeholder(#[from] UnresolvedPlaceholder),

    /// Resource properties could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while uploading the site
#[derive(Debug, Error)]
pub enum DeployError {
    /// Reading the site directory failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// S3 rejected an upload
    #[error("S3 put error: {0}")]
    S3PutError(String),

    /// The source directory does not exist
    #[error("Site source not found: {0}")]
    MissingSource(String),

    /// The config template could not be rendered
    #[error(transparent)]
    Placeholder(#[from] UnresolvedPlaceholder),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<SdkError<PutObjectError>> for DeployError {
    fn from(error: SdkError<PutObjectError>) -> Self {
        Self::S3PutError(error.to_string())
    }
}
