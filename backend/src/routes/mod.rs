mod docs;
mod health;
pub mod posts;

use aide::axum::{
    routing::{get, post},
    ApiRouter,
};

/// Creates the router with all handler routes, used by the local server
pub fn handler() -> ApiRouter {
    ApiRouter::new()
        .merge(docs::handler())
        .api_route("/health", get(health::handler))
        .api_route("/posts", get(posts::list_posts).post(posts::publish_post))
}

/// Router of the `get-posts` function, `GET /posts` only
pub fn get_posts_handler() -> ApiRouter {
    ApiRouter::new().api_route("/posts", get(posts::list_posts))
}

/// Router of the `publish-post` function, `POST /posts` only
pub fn publish_post_handler() -> ApiRouter {
    ApiRouter::new().api_route("/posts", post(posts::publish_post))
}
