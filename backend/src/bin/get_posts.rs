use backend::{routes, server, types::Environment};
use lambda_http::{run, Error};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let environment = Environment::from_env();
    server::init_tracing(&environment);

    let post_storage = server::post_storage(&environment).await;
    let app = server::app(routes::get_posts_handler(), environment, post_storage);

    run(app).await
}
