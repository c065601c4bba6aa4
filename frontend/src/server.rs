use std::path::PathBuf;
use std::time::Duration;

use axum::{extract::State, handler::Handler, response::Html, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ConfigLoader, CONFIG_FILE};
use crate::feed::FeedFetcher;
use crate::render;
use crate::session::FeedSession;

/// Shared dependencies of every page request
#[derive(Debug, Clone)]
pub struct AppState {
    pub config_loader: ConfigLoader,
    pub fetcher: FeedFetcher,
}

impl AppState {
    /// Builds the state for a site served at `site_origin`
    #[must_use]
    pub fn new(client: reqwest::Client, site_origin: &str) -> Self {
        Self {
            config_loader: ConfigLoader::new(client.clone(), site_origin),
            fetcher: FeedFetcher::new(client),
        }
    }
}

/// Every page request is a fresh session: config first, then the feed
async fn feed_page(State(state): State<AppState>) -> Html<String> {
    let mut session = FeedSession::new(state.config_loader, state.fetcher);
    let feed = session.load().await;
    Html(render::page(feed))
}

/// Feed page at `/`, static site files (`config.json`, `styles.css`) for everything else
///
/// Paths with no matching file render the feed page with `200`. `config.json` is the
/// exception: the page loads it from this server, so a missing file answers `404`.
pub fn app(state: AppState, site_dir: impl Into<PathBuf>) -> Router {
    let site_dir = site_dir.into();
    let config = ServeFile::new(site_dir.join(CONFIG_FILE));
    let site = ServeDir::new(site_dir).fallback(feed_page.with_state(state.clone()));

    Router::new()
        .route("/", get(feed_page))
        .route("/index.html", get(feed_page))
        .route_service(&format!("/{CONFIG_FILE}"), config)
        .fallback_service(site)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}

/// Serves the site until ctrl-c
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails
pub async fn start(listener: TcpListener, router: Router) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!("🦄 UniTok site started on http://{addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {err}");
            }
            tracing::info!("Shutting down");
        })
        .await
        .map_err(anyhow::Error::from)
}
