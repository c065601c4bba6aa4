//! UniTok posts API
//!
//! Serves `GET /posts` and `POST /posts`, either as a single local server or as two
//! Lambda functions behind API Gateway.

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

/// HTTP routes
pub mod routes;

/// Server and application assembly
pub mod server;

/// Environment, errors and extractors
pub mod types;
