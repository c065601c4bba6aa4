use std::sync::Arc;
use std::time::Duration;

use aide::{axum::ApiRouter, openapi::OpenApi};
use aws_sdk_dynamodb::Client as DynamoDbClient;
use axum::{Extension, Router};
use datadog_tracing::axum::{shutdown_signal, OtelAxumLayer, OtelInResponseLayer};
use post_storage::post::PostStorage;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{fmt, EnvFilter};

use crate::routes;
use crate::types::Environment;

/// Installs the tracing subscriber
///
/// Uses JSON output for staging/production and the regular format for development.
pub fn init_tracing(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if environment.json_logs() {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt().with_env_filter(filter).init();
    }
}

/// Builds the post storage for the environment
pub async fn post_storage(environment: &Environment) -> Arc<PostStorage> {
    let dynamodb_client = Arc::new(DynamoDbClient::new(&environment.aws_config().await));

    Arc::new(PostStorage::new(
        dynamodb_client,
        environment.posts_table_name(),
        environment.timestamp_index_name(),
    ))
}

/// Open cross-origin access, as configured on the gateway
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Finishes the given routes into an application with its dependencies attached
#[must_use]
pub fn app(
    routes: ApiRouter,
    environment: Environment,
    post_storage: Arc<PostStorage>,
) -> Router {
    let mut openapi = OpenApi::default();

    routes
        .finish_api(&mut openapi)
        .layer(Extension(openapi))
        .layer(Extension(environment))
        .layer(Extension(post_storage))
        .layer(cors_layer())
        .layer(tower_http::timeout::TimeoutLayer::new(Duration::from_secs(30)))
}

/// Starts the local server with every route
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the port
pub async fn start(
    environment: Environment,
    post_storage: Arc<PostStorage>,
) -> anyhow::Result<()> {
    let router = app(routes::handler(), environment, post_storage)
        // Include trace context as header into the response
        .layer(OtelInResponseLayer)
        // Start OpenTelemetry trace on incoming request
        .layer(OtelAxumLayer::default());

    let addr = std::net::SocketAddr::from((
        [0, 0, 0, 0],
        std::env::var("PORT").map_or(Ok(3001), |p| p.parse())?,
    ));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🦄 UniTok API started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}
