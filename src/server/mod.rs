//! Development server with live reload
//!
//! Serves the generated tree and the three dynamic endpoints the pages
//! need: the newsletter signup proxy (`POST /api/{provider}`) and the
//! consent mutations (`POST /consent/accept`, `POST /consent/revoke`).
//! HTML responses pass through the consent gate, which swaps the
//! embedded prompt for the analytics scripts once the cookie flag
//! reads true.

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::{header, HeaderMap, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;

use crate::consent::{self, analytics, ConsentGate, CookieStore, Decision};
use crate::newsletter::{NewsletterClient, SubscribeRequest};
use crate::Site;

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
    ws.onclose = function() {
        console.log('Live reload disconnected. Attempting to reconnect...');
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

/// Server state
struct ServerState {
    site: Site,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
    newsletter: NewsletterClient,
}

/// Start the development server
pub async fn start(site: &Site, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    // Broadcast channel for live reload notifications
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState {
        site: site.clone(),
        reload_tx: reload_tx.clone(),
        live_reload: watch,
        newsletter: NewsletterClient::new(site.config.newsletter.clone()),
    });

    let app = Router::new()
        .route("/__livereload", get(livereload_handler))
        .route("/api/:provider", post(newsletter_handler))
        .route("/consent/accept", post(consent_accept_handler))
        .route("/consent/revoke", post(consent_revoke_handler))
        .fallback(fallback_handler)
        .with_state(state);

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch {
        let site_clone = site.clone();
        tokio::spawn(async move {
            if let Err(e) = watch_and_reload(site_clone, reload_tx).await {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Watch for file changes and trigger reload
async fn watch_and_reload(site: Site, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Debounce to avoid multiple rapid rebuilds
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    let data_dir = site.data_dir.clone();
    let static_dir = site.base_dir.join(&site.config.static_dir);
    let config_path = site.base_dir.join("_config.yml");

    if data_dir.exists() {
        debouncer
            .watcher()
            .watch(&data_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", data_dir);
    }

    if static_dir.exists() {
        debouncer
            .watcher()
            .watch(&static_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", static_dir);
    }

    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                // Skip editor noise
                let relevant_events: Vec<_> = events
                    .iter()
                    .filter(|e| {
                        let path_str = e.path.to_string_lossy();
                        !path_str.contains(".git")
                            && !path_str.contains(".DS_Store")
                            && !path_str.ends_with('~')
                    })
                    .collect();

                if relevant_events.is_empty() {
                    continue;
                }

                println!();
                for event in &relevant_events {
                    println!("File changed: {}", event.path.display());
                }

                println!("\nRegenerating...");
                match site.generate() {
                    Ok(_) => {
                        println!("Regenerated successfully!");
                        let _ = reload_tx.send(());
                    }
                    Err(e) => {
                        println!("Generation failed: {}", e);
                    }
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
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

/// Newsletter signup proxy
///
/// Always answers 200 with one of the two fixed JSON bodies; the
/// outcome, not the transport, carries success or failure.
async fn newsletter_handler(
    State(state): State<Arc<ServerState>>,
    Path(provider): Path<String>,
    Json(request): Json<SubscribeRequest>,
) -> impl IntoResponse {
    let outcome = state.newsletter.subscribe(&provider, &request).await;
    Json(outcome.into_response())
}

/// `POST /consent/accept`: persist the opt-in flag and reload
async fn consent_accept_handler(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
) -> Response {
    mutate_consent(&state, &headers, |gate| gate.accept())
}

/// `POST /consent/revoke`: clear the flag and reload
async fn consent_revoke_handler(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
) -> Response {
    mutate_consent(&state, &headers, |gate| gate.revoke())
}

/// Apply one consent mutation, then redirect back so the next render
/// observes the new flag
fn mutate_consent<F>(state: &ServerState, headers: &HeaderMap, mutation: F) -> Response
where
    F: FnOnce(&mut ConsentGate<CookieStore>) -> Result<(), crate::consent::ConsentError>,
{
    let store = CookieStore::from_header(
        headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok()),
    );
    let mut gate = ConsentGate::new(store, &state.site.config.consent);

    if let Err(e) = mutation(&mut gate) {
        tracing::error!("Consent update failed: {}", e);
        return (StatusCode::INTERNAL_SERVER_ERROR, "Consent update failed").into_response();
    }

    let back = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("/");

    let mut response = Response::builder()
        .status(StatusCode::SEE_OTHER)
        .header(header::LOCATION, back);
    for cookie in gate.into_store().set_cookie_headers() {
        response = response.header(header::SET_COOKIE, cookie);
    }

    match response.body(Body::empty()) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Failed to build redirect: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Fallback handler serving generated files
///
/// HTML goes through the consent gate (and live reload injection);
/// everything else falls back to static file serving.
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let path = request.uri().path();

    let file_path = resolve_file(&state.site.public_dir, path);

    let is_html = file_path
        .extension()
        .map(|ext| ext == "html" || ext == "htm")
        .unwrap_or(false);

    if is_html {
        let decision = decision_from_request(&state, request.headers());
        match tokio::fs::read_to_string(&file_path).await {
            Ok(content) => {
                let decorated =
                    decorate_html(&content, decision, &state.site, state.live_reload);
                Html(decorated).into_response()
            }
            Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        }
    } else {
        let mut service =
            ServeDir::new(&state.site.public_dir).append_index_html_on_directories(true);
        match service.try_call(request).await {
            Ok(response) => response.into_response(),
            Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
        }
    }
}

/// Map a request path to a file under the public directory
fn resolve_file(public_dir: &std::path::Path, path: &str) -> PathBuf {
    if path == "/" {
        return public_dir.join("index.html");
    }

    let clean_path = path.trim_start_matches('/');
    let candidate = public_dir.join(clean_path);

    if candidate.is_dir() {
        candidate.join("index.html")
    } else if candidate.exists() {
        candidate
    } else {
        let with_html = public_dir.join(format!("{}.html", clean_path));
        if with_html.exists() {
            with_html
        } else {
            candidate
        }
    }
}

/// Read the consent decision from the request cookies
fn decision_from_request(state: &ServerState, headers: &HeaderMap) -> Decision {
    let store = CookieStore::from_header(
        headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok()),
    );
    match ConsentGate::new(store, &state.site.config.consent).decide() {
        Ok(decision) => decision,
        Err(e) => {
            tracing::warn!("Consent read failed, falling back to prompt: {}", e);
            Decision::Prompt
        }
    }
}

/// Apply the consent decision and optional live reload script to a page
fn decorate_html(html: &str, decision: Decision, site: &Site, live_reload: bool) -> String {
    let swapped = consent::apply_decision(html, decision, &analytics::scripts(&site.config));
    if live_reload {
        inject_live_reload(&swapped)
    } else {
        swapped
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::render::page_shell;
    use std::fs;
    use tempfile::TempDir;

    fn test_site() -> (TempDir, Site) {
        let tmp = TempDir::new().unwrap();
        let mut site = Site::new(tmp.path()).unwrap();
        site.config.environment = "production".to_string();
        site.config.analytics.plausible_data_domain = "example.com".to_string();
        (tmp, site)
    }

    #[test]
    fn test_decorate_html_keeps_prompt_without_consent() {
        let (_tmp, site) = test_site();
        let page = page_shell(&site.config, "Home", "<p>body</p>");
        let out = decorate_html(&page, Decision::Prompt, &site, false);
        assert!(out.contains("I Accept"));
        assert!(!out.contains("plausible.io"));
    }

    #[test]
    fn test_decorate_html_swaps_analytics_on_consent() {
        let (_tmp, site) = test_site();
        let page = page_shell(&site.config, "Home", "<p>body</p>");
        let out = decorate_html(&page, Decision::Analytics, &site, false);
        assert!(!out.contains("I Accept"));
        assert!(out.contains("plausible.io"));
    }

    #[test]
    fn test_live_reload_injection() {
        let html = "<html><body><p>hi</p></body></html>";
        let injected = inject_live_reload(html);
        assert!(injected.contains("__livereload"));
        assert_eq!(injected.matches("</body>").count(), 1);
    }

    #[test]
    fn test_resolve_file_variants() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("first-post")).unwrap();
        fs::write(tmp.path().join("index.html"), "home").unwrap();
        fs::write(tmp.path().join("first-post/index.html"), "post").unwrap();

        assert_eq!(
            resolve_file(tmp.path(), "/"),
            tmp.path().join("index.html")
        );
        assert_eq!(
            resolve_file(tmp.path(), "/first-post/"),
            tmp.path().join("first-post/index.html")
        );
        assert_eq!(
            resolve_file(tmp.path(), "/first-post"),
            tmp.path().join("first-post/index.html")
        );
    }
}
