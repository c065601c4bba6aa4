//! Environment configuration for different deployment stages

use std::env;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion};

/// `LocalStack` endpoint used in development unless overridden
const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";

/// Name of the GSI ordering posts by timestamp
const DEFAULT_TIMESTAMP_INDEX_NAME: &str = "TimestampIndex";

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack`)
    Development {
        /// Optional override for the AWS endpoint, defaults to `LocalStack`
        aws_endpoint_override: Option<String>,
    },
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development {
                aws_endpoint_override: env::var("AWS_ENDPOINT_URL")
                    .ok()
                    .filter(|url| !url.trim().is_empty()),
            },
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the posts table name for the environment
    ///
    /// # Panics
    ///
    /// Panics if the `POSTS_TABLE` environment variable is not set outside development
    #[must_use]
    pub fn posts_table_name(&self) -> String {
        match self {
            Self::Production | Self::Staging => {
                env::var("POSTS_TABLE").expect("POSTS_TABLE environment variable is not set")
            }
            Self::Development { .. } => {
                env::var("POSTS_TABLE").unwrap_or_else(|_| "unitok-posts".to_string())
            }
        }
    }

    /// Returns the name of the timestamp GSI
    #[must_use]
    pub fn timestamp_index_name(&self) -> String {
        env::var("TIMESTAMP_INDEX_NAME")
            .unwrap_or_else(|_| DEFAULT_TIMESTAMP_INDEX_NAME.to_string())
    }

    /// Whether to show API docs
    #[must_use]
    pub const fn show_api_docs(&self) -> bool {
        matches!(self, Self::Development { .. } | Self::Staging)
    }

    /// Whether logs should be emitted as JSON
    #[must_use]
    pub const fn json_logs(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }

    /// Returns the endpoint URL to use for AWS services
    #[must_use]
    pub fn override_aws_endpoint_url(&self) -> Option<&str> {
        match self {
            // Regular AWS endpoints for production and staging
            Self::Production | Self::Staging => None,
            Self::Development {
                aws_endpoint_override,
            } => Some(
                aws_endpoint_override
                    .as_deref()
                    .unwrap_or(LOCALSTACK_ENDPOINT),
            ),
        }
    }

    /// AWS configuration with retry and timeout settings
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut config_builder = aws_config::load_defaults(BehaviorVersion::latest())
            .await
            .to_builder()
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.override_aws_endpoint_url() {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        config_builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_environment_from_env() {
        env::remove_var("APP_ENV");
        env::remove_var("AWS_ENDPOINT_URL");
        assert_eq!(
            Environment::from_env(),
            Environment::Development {
                aws_endpoint_override: None
            }
        );

        env::set_var("APP_ENV", " Staging ");
        assert_eq!(Environment::from_env(), Environment::Staging);

        env::set_var("APP_ENV", "production");
        assert_eq!(Environment::from_env(), Environment::Production);

        env::remove_var("APP_ENV");
    }

    #[test]
    #[serial]
    #[should_panic(expected = "Invalid environment: invalid")]
    fn test_invalid_environment() {
        env::set_var("APP_ENV", "invalid");
        let _ = Environment::from_env();
    }

    #[test]
    #[serial]
    fn test_aws_endpoint_override() {
        env::set_var("APP_ENV", "development");
        env::set_var("AWS_ENDPOINT_URL", "http://dynamodb.local:8000");

        let env = Environment::from_env();
        assert_eq!(
            env.override_aws_endpoint_url(),
            Some("http://dynamodb.local:8000")
        );

        env::remove_var("AWS_ENDPOINT_URL");
        let env = Environment::from_env();
        assert_eq!(env.override_aws_endpoint_url(), Some(LOCALSTACK_ENDPOINT));

        assert_eq!(Environment::Production.override_aws_endpoint_url(), None);
        env::remove_var("APP_ENV");
    }

    #[test]
    #[serial]
    fn test_posts_table_defaults_in_development() {
        env::remove_var("POSTS_TABLE");
        env::remove_var("TIMESTAMP_INDEX_NAME");
        let env = Environment::Development {
            aws_endpoint_override: None,
        };

        assert_eq!(env.posts_table_name(), "unitok-posts");
        assert_eq!(env.timestamp_index_name(), "TimestampIndex");

        env::set_var("POSTS_TABLE", "UniTokStack-PostsTable");
        assert_eq!(env.posts_table_name(), "UniTokStack-PostsTable");
        env::remove_var("POSTS_TABLE");
    }

    #[test]
    #[serial]
    #[should_panic(expected = "POSTS_TABLE environment variable is not set")]
    fn test_posts_table_required_in_production() {
        env::remove_var("POSTS_TABLE");
        let _ = Environment::Production.posts_table_name();
    }

    #[test]
    fn test_api_docs_hidden_in_production() {
        assert!(!Environment::Production.show_api_docs());
        assert!(Environment::Staging.show_api_docs());
        assert!(Environment::Production.json_logs());
    }
}
