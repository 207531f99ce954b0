//! Shared utilities for integration tests.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

/// A JSON-RPC reply: `Ok(result)` or `Err((code, message))`.
pub type Reply = Result<Value, (i64, String)>;

type Responder = dyn Fn(&str, &Value) -> Reply + Send + Sync;

/// Scripted JSON-RPC node.
pub struct MockNode {
    responder: Box<Responder>,
    calls: AtomicUsize,
}

impl MockNode {
    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

async fn handle_rpc(State(node): State<Arc<MockNode>>, Json(request): Json<Value>) -> Json<Value> {
    node.calls.fetch_add(1, Ordering::SeqCst);
    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default();
    let params = request.get("params").cloned().unwrap_or(Value::Null);

    let body = match (node.responder)(method, &params) {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err((code, message)) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": code, "message": message }
        }),
    };
    Json(body)
}

/// Start a mock node on a free local port. Returns its URL and a handle for
/// inspecting call counts.
pub async fn start_mock_node<F>(responder: F) -> (String, Arc<MockNode>)
where
    F: Fn(&str, &Value) -> Reply + Send + Sync + 'static,
{
    let node = Arc::new(MockNode {
        responder: Box::new(responder),
        calls: AtomicUsize::new(0),
    });
    let app = Router::new()
        .route("/", post(handle_rpc))
        .with_state(node.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{}", addr), node)
}

/// Start a mock faucet answering every request with `body`. Returns the gas URL.
#[allow(dead_code)]
pub async fn start_mock_faucet(body: Value) -> String {
    let app = Router::new().route(
        "/gas",
        post(move |Json(request): Json<Value>| {
            let body = body.clone();
            async move {
                assert!(request["FixedAmountRequest"]["recipient"].is_string());
                Json(body)
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    format!("http://{}/gas", addr)
}
