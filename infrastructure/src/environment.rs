//! Deployment target resolved from the environment

use std::env;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion, Region};

/// Region used when `CDK_DEFAULT_REGION` is unset
pub const DEFAULT_REGION: &str = "us-east-1";

/// Account and region the stack is deployed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployTarget {
    /// Left to the provisioning engine when unset
    pub account: Option<String>,
    pub region: String,
    /// Alternate AWS endpoint, e.g. `LocalStack`
    pub endpoint_override: Option<String>,
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl DeployTarget {
    /// Reads `CDK_DEFAULT_ACCOUNT`, `CDK_DEFAULT_REGION` and `AWS_ENDPOINT_URL`
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            account: non_empty("CDK_DEFAULT_ACCOUNT"),
            region: non_empty("CDK_DEFAULT_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            endpoint_override: non_empty("AWS_ENDPOINT_URL"),
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

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = &self.endpoint_override {
            loader = loader.endpoint_url(endpoint_url);
        }

        loader.load().await
    }

    /// S3 configuration; path-style addressing when talking to an endpoint override
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&aws_config);

        if self.endpoint_override.is_some() {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }
}
