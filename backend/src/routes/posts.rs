use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};
use common_types::Post;
use post_storage::post::{PostCreateRequest, PostStorage};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use crate::types::{AppError, ValidatedJson};

/// Request to publish a new post
#[derive(Debug, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    /// Text content of the post
    #[validate(required(message = "Content is required"))]
    pub content: Option<String>,
    /// Author display name, defaults to "Anonymous Unicorn"
    pub author: Option<String>,
    /// One of pink, blue, purple, green, yellow or rainbow (default)
    pub unicorn_color: Option<String>,
    /// Optional image URL
    pub image_url: Option<String>,
}

/// List the most recent posts
///
/// Returns up to 50 posts ordered newest first.
///
/// # Errors
///
/// - `500 INTERNAL_SERVER_ERROR` - Storage operation fails
#[instrument(skip_all)]
pub async fn list_posts(
    Extension(post_storage): Extension<Arc<PostStorage>>,
) -> Result<Json<Vec<Post>>, AppError> {
    let posts = post_storage.list_recent().await?;

    Ok(Json(posts))
}

/// Publish a new post
///
/// # Returns
///
/// Returns `201 CREATED` with the stored post
///
/// # Errors
///
/// - `400 BAD_REQUEST` - Missing body, invalid JSON or missing `content`
/// - `500 INTERNAL_SERVER_ERROR` - Storage operation fails
#[instrument(skip_all)]
pub async fn publish_post(
    Extension(post_storage): Extension<Arc<PostStorage>>,
    ValidatedJson(payload): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let Some(content) = payload.content else {
        return Err(AppError::new(
            StatusCode::BAD_REQUEST,
            "content_required",
            "Content is required",
        ));
    };

    let post = post_storage
        .create(PostCreateRequest {
            content,
            author: payload.author,
            unicorn_color: payload.unicorn_color,
            image_url: payload.image_url,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(post)))
}
