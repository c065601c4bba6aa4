//! Storage services for UniTok
//!
//! This crate provides the `DynamoDB` access shared by the `get-posts` and `publish-post`
//! handlers.

pub mod post;
