//! UniTok front end
//!
//! Loads `config.json` from the site origin, fetches the feed from the configured API and
//! renders it as HTML. A small axum server serves the rendered page next to the static site.

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

/// Runtime configuration loading
pub mod config;

/// Feed fetching and session state
pub mod feed;

/// Publish client
pub mod publish;

pub mod render;

/// Page server
pub mod server;

pub mod session;
