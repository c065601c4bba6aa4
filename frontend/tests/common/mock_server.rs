use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use common_types::Post;
use tokio::sync::oneshot;

/// What `GET /posts` answers with
#[derive(Debug, Clone)]
pub enum PostsResponse {
    Posts(Vec<Post>),
    Status(StatusCode),
    Raw(&'static str),
}

struct MockState {
    base_url: String,
    serve_config: bool,
    posts: PostsResponse,
    config_hits: AtomicUsize,
    posts_hits: AtomicUsize,
    published: std::sync::Mutex<Vec<serde_json::Value>>,
}

/// Site origin and posts API in one server on an ephemeral port
pub struct MockServer {
    pub port: u16,
    state: Arc<MockState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockServer {
    /// Starts a server whose `config.json` points back at itself
    pub async fn start(posts: PostsResponse) -> Self {
        Self::start_with(true, posts).await
    }

    /// Starts a server whose `config.json` answers `500`
    pub async fn without_config(posts: PostsResponse) -> Self {
        Self::start_with(false, posts).await
    }

    async fn start_with(serve_config: bool, posts: PostsResponse) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let state = Arc::new(MockState {
            base_url: format!("http://127.0.0.1:{port}"),
            serve_config,
            posts,
            config_hits: AtomicUsize::new(0),
            posts_hits: AtomicUsize::new(0),
            published: std::sync::Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/config.json", get(handle_config))
            .route("/posts", get(handle_posts).post(handle_publish))
            .with_state(state.clone());

        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            port,
            state,
            shutdown_tx: Some(tx),
        }
    }

    pub fn base_url(&self) -> String {
        self.state.base_url.clone()
    }

    pub fn config_hits(&self) -> usize {
        self.state.config_hits.load(Ordering::SeqCst)
    }

    pub fn posts_hits(&self) -> usize {
        self.state.posts_hits.load(Ordering::SeqCst)
    }

    pub fn published(&self) -> Vec<serde_json::Value> {
        self.state.published.lock().unwrap().clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn handle_config(State(state): State<Arc<MockState>>) -> Response {
    state.config_hits.fetch_add(1, Ordering::SeqCst);

    if !state.serve_config {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    // Trailing slash on purpose: the client must not produce `//posts`
    Json(serde_json::json!({ "apiEndpoint": format!("{}/", state.base_url) })).into_response()
}

async fn handle_posts(State(state): State<Arc<MockState>>) -> Response {
    state.posts_hits.fetch_add(1, Ordering::SeqCst);

    match &state.posts {
        PostsResponse::Posts(posts) => Json(posts.clone()).into_response(),
        PostsResponse::Status(status) => (
            *status,
            Json(serde_json::json!({ "error": "Internal server error" })),
        )
            .into_response(),
        PostsResponse::Raw(body) => (*body).into_response(),
    }
}

async fn handle_publish(
    State(state): State<Arc<MockState>>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    state.published.lock().unwrap().push(body.clone());

    let post = serde_json::json!({
        "postId": "2f1b6c1e-8d0a-4c53-9d6f-0b1e3a7c9f10",
        "author": body.get("author").cloned().unwrap_or_else(|| "Anonymous Unicorn".into()),
        "content": body["content"],
        "timestamp": 1_700_000_000_000_i64,
        "likes": 0,
        "unicornColor": body.get("unicornColor").cloned().unwrap_or_else(|| "rainbow".into()),
    });

    (StatusCode::CREATED, Json(post)).into_response()
}
