use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use frontend::config::ConfigLoader;
use frontend::publish::{NewPost, PostPublisher};
use frontend::server::{self, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// UniTok front end
#[derive(Parser, Debug)]
#[command(name = "frontend")]
#[command(about = "Serve the UniTok feed or publish a post")]
struct Args {
    /// Emit logs as JSON
    #[arg(long, env = "UNITOK_JSON_LOGS", global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the static site and the rendered feed page
    Serve {
        /// Listen address
        #[arg(long, default_value = "0.0.0.0:8080", env = "UNITOK_LISTEN")]
        listen: SocketAddr,

        /// Directory holding `config.json` and `styles.css`
        #[arg(long, default_value = "frontend/site", env = "UNITOK_SITE_DIR")]
        site_dir: PathBuf,

        /// Origin `config.json` is loaded from; defaults to this server
        #[arg(long, env = "UNITOK_SITE_ORIGIN")]
        site_origin: Option<String>,
    },
    /// Publish a post to the configured API
    Publish {
        /// Origin `config.json` is loaded from
        #[arg(long, default_value = "http://localhost:8080", env = "UNITOK_SITE_ORIGIN")]
        site_origin: String,

        #[arg(long)]
        content: String,

        #[arg(long)]
        author: Option<String>,

        /// pink, blue, purple, green, yellow or rainbow
        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        image_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if args.json_logs {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let client = reqwest::Client::new();

    match args.command {
        Command::Serve {
            listen,
            site_dir,
            site_origin,
        } => {
            let listener = TcpListener::bind(listen).await?;
            let origin =
                site_origin.unwrap_or_else(|| format!("http://localhost:{}", listen.port()));
            tracing::info!("Loading config from {origin}/config.json");

            let router = server::app(AppState::new(client, &origin), site_dir);
            server::start(listener, router).await
        }
        Command::Publish {
            site_origin,
            content,
            author,
            color,
            image_url,
        } => {
            let config = ConfigLoader::new(client.clone(), &site_origin).load().await;
            let post = PostPublisher::new(client)
                .publish(
                    &config,
                    &NewPost {
                        content,
                        author,
                        unicorn_color: color,
                        image_url,
                    },
                )
                .await?;

            tracing::info!("Published post {} by {}", post.post_id, post.author);
            println!("{}", post.post_id);
            Ok(())
        }
    }
}
