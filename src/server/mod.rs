//! HTTP server: JSON API over the post store, static files, live reload

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Component, Path as FsPath, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, Mutex, RwLock};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::MarkdownRenderer;
use crate::prefs::PreferenceFile;
use crate::router::{NavEvent, Router as HashRouter};
use crate::store::{filter_posts, PostStore};
use crate::view::{HomeView, ViewBuilder, ViewModel};
use crate::Blog;

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
})();
</script>
</body>
"#;

/// Server state
pub struct ServerState {
    blog: Blog,
    store: RwLock<PostStore>,
    prefs: Mutex<PreferenceFile>,
    renderer: MarkdownRenderer,
    public_dir: PathBuf,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

impl ServerState {
    pub fn new(blog: Blog, store: PostStore, live_reload: bool) -> Self {
        let (reload_tx, _) = broadcast::channel::<()>(16);
        Self {
            renderer: blog.renderer(),
            prefs: Mutex::new(blog.preferences()),
            public_dir: blog.base_dir.join(&blog.config.server.public_dir),
            store: RwLock::new(store),
            blog,
            reload_tx,
            live_reload,
        }
    }

    fn views(&self) -> ViewBuilder<'_> {
        ViewBuilder::new(&self.renderer, &self.blog.config.date_format)
    }

    /// Rebuild the store from the post files and notify live-reload clients
    pub async fn reload(&self) {
        let posts = self.blog.load_posts().await;
        self.store.write().await.replace(posts);
        let _ = self.reload_tx.send(());
    }
}

/// Build the application router
pub fn app(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/posts/:id", get(get_post))
        .route("/api/view", get(view))
        .route(
            "/api/prefs/dark-mode",
            get(get_dark_mode).post(toggle_dark_mode),
        )
        .route("/__livereload", get(livereload_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    let store = blog.load_store().await;
    let state = Arc::new(ServerState::new(blog.clone(), store, watch));

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if watch {
        println!("Watching {:?} for changes...", blog.posts_dir);
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch {
        let watched = state.clone();
        tokio::spawn(async move {
            if let Err(e) = watch_and_reload(watched).await {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

/// Rebuild the store whenever a post file changes
async fn watch_and_reload(state: Arc<ServerState>) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<DebounceEventResult>();

    let mut debouncer = new_debouncer(Duration::from_millis(500), move |res: DebounceEventResult| {
        let _ = tx.send(res);
    })?;

    let posts_dir = &state.blog.posts_dir;
    if !posts_dir.exists() {
        tracing::warn!("Not watching {:?}: directory does not exist", posts_dir);
        return Ok(());
    }
    debouncer
        .watcher()
        .watch(posts_dir, RecursiveMode::NonRecursive)?;
    tracing::debug!("Watching: {:?}", posts_dir);

    while let Some(result) = rx.recv().await {
        match result {
            Ok(events) => {
                let changed: Vec<_> = events
                    .iter()
                    .filter(|e| e.path.extension().map(|ext| ext == "md").unwrap_or(false))
                    .collect();
                if changed.is_empty() {
                    continue;
                }
                for event in &changed {
                    tracing::info!("Post changed: {}", event.path.display());
                }
                state.reload().await;
                tracing::info!("Reloaded {} posts", state.store.read().await.len());
            }
            Err(e) => {
                tracing::error!("Watch error: {:?}", e);
            }
        }
    }

    Ok(())
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ViewParams {
    hash: Option<String>,
    q: Option<String>,
}

/// A view model plus the location hash the client should end up with
#[derive(Debug, Serialize)]
struct ViewResponse {
    hash: String,
    #[serde(flatten)]
    view: ViewModel,
}

#[derive(Debug, Serialize)]
struct DarkMode {
    dark_mode: bool,
}

async fn list_posts(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<ListParams>,
) -> Json<HomeView> {
    let store = state.store.read().await;
    let query = params.q.unwrap_or_default();
    Json(
        state
            .views()
            .listing(filter_posts(store.posts(), &query), &query),
    )
}

async fn get_post(State(state): State<Arc<ServerState>>, Path(id): Path<String>) -> Response {
    let store = state.store.read().await;
    match store.get(&id) {
        Some(post) => Json(state.views().article(post)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("no post with id {}", id) })),
        )
            .into_response(),
    }
}

/// Resolve a location hash the way the client router would
async fn view(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<ViewParams>,
) -> Json<ViewResponse> {
    let store = state.store.read().await;
    let query = params.q.unwrap_or_default();

    let mut router = HashRouter::new();
    router.handle(NavEvent::HashChanged(params.hash.unwrap_or_default()), &store);

    let page = state.views().page(&store, router.route(), &query);

    let dark_mode = state.prefs.lock().await.dark_mode();

    Json(ViewResponse {
        hash: router.hash().to_string(),
        view: ViewModel { dark_mode, page },
    })
}

async fn get_dark_mode(State(state): State<Arc<ServerState>>) -> Json<DarkMode> {
    let dark_mode = state.prefs.lock().await.dark_mode();
    Json(DarkMode { dark_mode })
}

async fn toggle_dark_mode(State(state): State<Arc<ServerState>>) -> Response {
    let mut prefs = state.prefs.lock().await;
    match prefs.toggle_dark_mode() {
        Ok(dark_mode) => Json(DarkMode { dark_mode }).into_response(),
        Err(e) => {
            tracing::error!("Failed to save preferences: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to save preferences").into_response()
        }
    }
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Serve files from the public directory, injecting the live reload script
/// into HTML when watching
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let Some(file_path) = public_file(&state.public_dir, request.uri().path()) else {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };

    let is_html = file_path
        .extension()
        .map(|ext| ext == "html" || ext == "htm")
        .unwrap_or(false);

    if is_html && state.live_reload {
        match tokio::fs::read_to_string(&file_path).await {
            Ok(content) => Html(inject_live_reload(&content)).into_response(),
            Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        }
    } else {
        let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
        match service.try_call(request).await {
            Ok(response) => response.into_response(),
            Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
        }
    }
}

/// Map a request path onto `public_dir`. Paths with `..`, root or prefix
/// components are refused so nothing outside `public_dir` is reachable.
fn public_file(public_dir: &FsPath, uri_path: &str) -> Option<PathBuf> {
    let relative = FsPath::new(uri_path.trim_start_matches('/'));
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }

    if relative.as_os_str().is_empty() {
        Some(public_dir.join("index.html"))
    } else {
        Some(public_dir.join(relative))
    }
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replace("</body>", LIVE_RELOAD_SCRIPT)
    } else {
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
