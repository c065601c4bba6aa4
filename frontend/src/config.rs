//! Loading of the `config.json` document

use std::time::Duration;

use common_types::Config;
use thiserror::Error;

/// Name of the config document at the site root
pub const CONFIG_FILE: &str = "config.json";

/// Upper bound on a single `config.json` request
pub const CONFIG_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// `config.json` was readable but carried no API endpoint
    #[error("Config document has no apiEndpoint")]
    MissingEndpoint,
}

/// Fetches `{site origin}/config.json`, falling back to a fixed endpoint on any failure
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    client: reqwest::Client,
    config_url: String,
    fallback: Config,
    timeout: Duration,
}

impl ConfigLoader {
    /// Creates a loader for the site served at `site_origin`
    #[must_use]
    pub fn new(client: reqwest::Client, site_origin: &str) -> Self {
        Self {
            client,
            config_url: format!("{}/{CONFIG_FILE}", site_origin.trim_end_matches('/')),
            fallback: Config::local(),
            timeout: CONFIG_TIMEOUT,
        }
    }

    /// Replaces the fallback configuration
    #[must_use]
    pub fn with_fallback(mut self, fallback: Config) -> Self {
        self.fallback = fallback;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn config_url(&self) -> &str {
        &self.config_url
    }

    /// Loads the configuration. Never fails: errors are logged and the fallback is returned.
    pub async fn load(&self) -> Config {
        match self.try_load().await {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    "Failed to load config from {}: {err}, using {}",
                    self.config_url,
                    self.fallback.api_endpoint
                );
                self.fallback.clone()
            }
        }
    }

    async fn try_load(&self) -> Result<Config, ConfigError> {
        let config = self
            .client
            .get(&self.config_url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .json::<Config>()
            .await?;

        if config.api_endpoint.trim().is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_url_from_origin() {
        let loader = ConfigLoader::new(reqwest::Client::new(), "https://d123.cloudfront.net/");
        assert_eq!(loader.config_url(), "https://d123.cloudfront.net/config.json");
    }

    #[tokio::test]
    async fn test_unreachable_origin_uses_local_endpoint() {
        // Port 9 (discard) is not expected to serve HTTP
        let loader = ConfigLoader::new(reqwest::Client::new(), "http://127.0.0.1:9");

        let config = loader.load().await;

        assert_eq!(config, Config::local());
        assert_eq!(config.posts_url(), "http://localhost:3001/posts");
    }
}
