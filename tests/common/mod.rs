//! Test harness: an in-process server on an ephemeral port backed by an
//! in-memory SQLite database.

#![allow(clippy::panic, dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use notify_gateway::app_state::AppState;
use notify_gateway::auth::TokenSigner;
use notify_gateway::persistence::SqliteUserStore;
use notify_gateway::server;
use notify_gateway::service::UserService;
use notify_gateway::ws::WsRegistry;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

/// Client side of a test WebSocket.
pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A running server plus handles the tests inspect.
pub struct TestServer {
    /// Bound address.
    pub addr: SocketAddr,
    /// The registry the server broadcasts through.
    pub registry: Arc<WsRegistry>,
    /// HTTP client reused across requests.
    pub http: reqwest::Client,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Builds application state over a fresh in-memory database.
pub async fn test_state() -> AppState {
    let Ok(store) = SqliteUserStore::connect("sqlite::memory:", 1, 5).await else {
        panic!("in-memory database");
    };
    let Ok(()) = store.migrate().await else {
        panic!("migration failed");
    };
    let Ok(tokens) = TokenSigner::new(b"integration-secret", 3600) else {
        panic!("token signer");
    };
    let registry = Arc::new(WsRegistry::new());
    AppState::new(Arc::new(UserService::new(store, tokens, registry, 8)))
}

/// Starts a server on `127.0.0.1:0`.
pub async fn spawn_server() -> TestServer {
    let state = test_state().await;
    let registry = Arc::clone(&state.registry);
    let app = server::build_app(state);

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };

    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(server::serve(listener, app, async move {
        let _ = rx.await;
    }));

    TestServer {
        addr,
        registry,
        http: reqwest::Client::new(),
        shutdown: Some(tx),
    }
}

impl TestServer {
    /// `http://addr{path}`.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Registers an account and returns the response.
    pub async fn register(&self, email: &str, password: &str) -> reqwest::Response {
        let body = serde_json::json!({ "email": email, "password": password });
        let Ok(resp) = self.http.post(self.url("/api/register")).json(&body).send().await else {
            panic!("register request failed");
        };
        resp
    }

    /// Logs in and returns the access token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let body = serde_json::json!({ "email": email, "password": password });
        let Ok(resp) = self.http.post(self.url("/api/login")).json(&body).send().await else {
            panic!("login request failed");
        };
        let Ok(json) = resp.json::<serde_json::Value>().await else {
            panic!("login response not json");
        };
        let Some(token) = json.get("access_token").and_then(|v| v.as_str()) else {
            panic!("no access_token in {json}");
        };
        token.to_string()
    }

    /// Opens a WebSocket to `path` (e.g. `/api/ws`).
    pub async fn connect_ws(&self, path: &str) -> WsClient {
        let url = format!("ws://{}{path}", self.addr);
        let Ok((stream, _)) = tokio_tungstenite::connect_async(url.as_str()).await else {
            panic!("websocket handshake failed for {url}");
        };
        stream
    }

    /// Waits until the registry holds exactly `expected` connections.
    pub async fn wait_for_connections(&self, expected: usize) {
        let poll = async {
            while self.registry.connection_count().await != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        };
        if tokio::time::timeout(Duration::from_secs(5), poll).await.is_err() {
            panic!(
                "expected {expected} connections, have {}",
                self.registry.connection_count().await
            );
        }
    }
}

/// Next text frame, or `None` if nothing arrives within `wait`.
pub async fn next_text(ws: &mut WsClient, wait: Duration) -> Option<String> {
    loop {
        let frame = tokio::time::timeout(wait, ws.next()).await.ok()??;
        match frame {
            Ok(Message::Text(text)) => return Some(text.as_str().to_string()),
            Ok(Message::Ping(_) | Message::Pong(_)) => continue,
            _ => return None,
        }
    }
}
