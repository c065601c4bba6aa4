use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use axum::{body::Body, http::Request, response::Response, Router};
use backend::{routes, server, types::Environment};
use post_storage::post::PostStorage;
use std::sync::Arc;
use tower::ServiceExt;

use super::dynamodb_setup::{DynamoDbTestSetup, TEST_TIMESTAMP_INDEX_NAME};

const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";

/// Setup test environment variables with all the required configuration
pub fn setup_test_env() {
    dotenvy::from_path(".env.example").ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// Base test setup with core dependencies
pub struct TestSetup {
    pub router: Router,
    pub environment: Environment,
    pub post_storage: Arc<PostStorage>,
    // Keep DynamoDbTestSetup alive for the duration of the test
    _dynamodb_setup: DynamoDbTestSetup,
}

impl TestSetup {
    pub async fn new() -> Self {
        Self::with_routes(routes::handler()).await
    }

    pub async fn with_routes(routes: aide::axum::ApiRouter) -> Self {
        setup_test_env();

        let environment = Environment::Development {
            aws_endpoint_override: Some(LOCALSTACK_ENDPOINT.to_string()),
        };

        let config = aws_config::defaults(BehaviorVersion::latest())
            .endpoint_url(LOCALSTACK_ENDPOINT)
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::from_keys("test", "test", None))
            .load()
            .await;
        let dynamodb_client = Arc::new(DynamoDbClient::new(&config));
        let dynamodb_test_setup = DynamoDbTestSetup::new(dynamodb_client.clone()).await;

        let post_storage = Arc::new(PostStorage::new(
            dynamodb_client,
            dynamodb_test_setup.posts_table_name.clone(),
            TEST_TIMESTAMP_INDEX_NAME.to_string(),
        ));

        let router = server::app(routes, environment.clone(), post_storage.clone());

        Self {
            router,
            environment,
            post_storage,
            _dynamodb_setup: dynamodb_test_setup,
        }
    }

    pub async fn send_post_request(
        &self,
        route: &str,
        body: impl Into<Body>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("POST")
            .header("Content-Type", "application/json")
            .header("Origin", "https://unitok.example.com")
            .body(body.into())?;

        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_get_request(
        &self,
        route: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("GET")
            .header("Origin", "https://unitok.example.com")
            .body(Body::empty())?;
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn parse_response_body(
        &self,
        response: Response,
    ) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
        use http_body_util::BodyExt;

        let body = response.into_body().collect().await?.to_bytes();
        let json = serde_json::from_slice(&body)?;
        Ok(json)
    }
}
