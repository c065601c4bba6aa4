use backend::{server, types::Environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env();
    server::init_tracing(&environment);

    tracing::info!("Starting UniTok API in {environment:?} environment");

    let post_storage = server::post_storage(&environment).await;

    server::start(environment, post_storage).await
}
