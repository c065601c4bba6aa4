#![allow(dead_code)]

pub mod mock_server;

use common_types::Post;

pub use mock_server::{MockServer, PostsResponse};

pub fn post(id: &str, color: &str, timestamp: i64) -> Post {
    Post {
        post_id: id.to_string(),
        author: format!("Unicorn {id}"),
        content: format!("Post {id}"),
        timestamp,
        likes: 3,
        unicorn_color: color.to_string(),
        image_url: None,
    }
}
