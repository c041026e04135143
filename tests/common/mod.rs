#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use portfolio_chat::services::{
    chat_proxy::ChatProxy, gate::ConcurrencyGate, openrouter::OpenRouterClient,
    prompt::PersonaLinks,
};
use serde_json::Value;
use tokio::sync::Mutex;

pub const COMPLETIONS_PATH: &str = "/api/v1/chat/completions";

#[derive(Clone, Debug)]
pub struct CapturedRequest {
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Clone)]
pub struct MockUpstream {
    pub requests: Arc<Mutex<Vec<CapturedRequest>>>,
    status: StatusCode,
    body: String,
    delay: Duration,
    active: Arc<AtomicUsize>,
    pub peak: Arc<AtomicUsize>,
}

impl MockUpstream {
    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

async fn handle_completion(
    State(mock): State<MockUpstream>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    mock.requests.lock().await.push(CapturedRequest { headers, body });

    let now = mock.active.fetch_add(1, Ordering::SeqCst) + 1;
    mock.peak.fetch_max(now, Ordering::SeqCst);
    if !mock.delay.is_zero() {
        tokio::time::sleep(mock.delay).await;
    }
    mock.active.fetch_sub(1, Ordering::SeqCst);

    (mock.status, mock.body.clone())
}

/// Serve canned completions on an ephemeral port. Returns the full
/// completions URL.
pub async fn spawn_upstream(status: StatusCode, body: &str, delay: Duration) -> (String, MockUpstream) {
    let mock = MockUpstream {
        requests: Arc::new(Mutex::new(Vec::new())),
        status,
        body: body.to_string(),
        delay,
        active: Arc::new(AtomicUsize::new(0)),
        peak: Arc::new(AtomicUsize::new(0)),
    };
    let app = Router::new()
        .route(COMPLETIONS_PATH, post(handle_completion))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock upstream");
    let addr = listener.local_addr().expect("mock upstream address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    wait_for_listener(addr).await;

    (format!("http://{addr}{COMPLETIONS_PATH}"), mock)
}

/// A URL on which nothing is listening.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    format!("http://{addr}{COMPLETIONS_PATH}")
}

async fn wait_for_listener(addr: std::net::SocketAddr) {
    for _ in 0..20 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

pub fn test_links() -> PersonaLinks {
    PersonaLinks {
        projects: "/projects".to_string(),
        github: "https://github.com/example".to_string(),
        linkedin: "https://www.linkedin.com/in/example".to_string(),
    }
}

pub fn proxy_for(url: &str, capacity: usize, profile: Option<Value>) -> ChatProxy {
    let client = OpenRouterClient::new(url, "sk-test-key", "https://portfolio.example", Duration::from_secs(5))
        .expect("build client");
    ChatProxy::new(
        ConcurrencyGate::new(capacity),
        client,
        "openai/gpt-3.5-turbo",
        test_links(),
        profile.map(Arc::new),
    )
}

pub fn reply_body(content: &str) -> String {
    serde_json::json!({"choices": [{"message": {"role": "assistant", "content": content}}]}).to_string()
}
