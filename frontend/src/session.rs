//! One page session: config load, then feed fetch

use common_types::Config;

use crate::config::ConfigLoader;
use crate::feed::{FeedFetcher, FeedState};

/// Owns the session-scoped state of a single page load
#[derive(Debug)]
pub struct FeedSession {
    config_loader: ConfigLoader,
    fetcher: FeedFetcher,
    config: Option<Config>,
    state: FeedState,
}

impl FeedSession {
    #[must_use]
    pub fn new(config_loader: ConfigLoader, fetcher: FeedFetcher) -> Self {
        Self {
            config_loader,
            fetcher,
            config: None,
            state: FeedState::Loading,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &FeedState {
        &self.state
    }

    #[must_use]
    pub const fn config(&self) -> Option<&Config> {
        self.config.as_ref()
    }

    /// Runs the load sequence: config first, then the feed.
    pub async fn load(&mut self) -> &FeedState {
        let config = self.config_loader.load().await;
        self.apply_config(config).await;
        &self.state
    }

    /// Sets the configuration and fetches the feed if it changed.
    ///
    /// Returns whether a fetch was issued.
    pub async fn apply_config(&mut self, config: Config) -> bool {
        if self.config.as_ref() == Some(&config) {
            return false;
        }

        self.state = FeedState::Loading;
        let result = self.fetcher.fetch(&config).await;
        self.config = Some(config);
        self.state = FeedState::from_fetch(result);
        true
    }

    /// "Try Again": discards the session and runs the whole load sequence from scratch.
    pub async fn reload(&mut self) -> &FeedState {
        tracing::info!("Reloading feed session");
        self.config = None;
        self.state = FeedState::Loading;
        self.load().await
    }
}
