//! Local stand-in for the Bot API used by tests.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use {
    axum::{
        Json, Router,
        body::Bytes,
        extract::State,
        http::Uri,
        routing::post,
    },
    serde_json::{Value, json},
    tokio::sync::oneshot,
};

#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub body: Value,
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<Captured>>>,
    failing_chats: Arc<Mutex<HashSet<i64>>>,
    not_modified: Arc<Mutex<bool>>,
    rate_limited: Arc<Mutex<usize>>,
}

pub struct MockTelegramApi {
    state: MockState,
    pub bot: teloxide::Bot,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockTelegramApi {
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .route("/{*path}", post(handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("serve mock telegram api");
        });

        let api_url = reqwest::Url::parse(&format!("http://{addr}/")).expect("parse api url");
        Self {
            state,
            bot: teloxide::Bot::new("test-token").set_api_url(api_url),
            shutdown: Some(shutdown_tx),
        }
    }

    /// Every send to `chat_id` returns "Forbidden: bot was blocked by the user".
    pub fn fail_chat(&self, chat_id: i64) {
        self.state
            .failing_chats
            .lock()
            .expect("lock")
            .insert(chat_id);
    }

    /// Edits return "message is not modified".
    pub fn edits_not_modified(&self) {
        *self.state.not_modified.lock().expect("lock") = true;
    }

    /// The next `count` sends are refused with a one-second flood wait.
    pub fn rate_limit_next(&self, count: usize) {
        *self.state.rate_limited.lock().expect("lock") = count;
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.state.requests.lock().expect("lock").clone()
    }

    pub fn bodies(&self, method: &str) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .map(|r| r.body)
            .collect()
    }
}

impl Drop for MockTelegramApi {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

fn message_result(chat_id: i64) -> Value {
    json!({
        "message_id": 500,
        "date": 0,
        "chat": { "id": chat_id, "type": "private", "first_name": "Mock" },
        "text": "ok"
    })
}

async fn handler(State(state): State<MockState>, uri: Uri, body: Bytes) -> Json<Value> {
    let method = uri.path().rsplit('/').next().unwrap_or_default().to_string();
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let chat_id = body.get("chat_id").and_then(Value::as_i64).unwrap_or(0);
    state.requests.lock().expect("lock").push(Captured {
        method: method.clone(),
        body,
    });

    let failing = state.failing_chats.lock().expect("lock").contains(&chat_id);
    let rate_limited = {
        let mut remaining = state.rate_limited.lock().expect("lock");
        let limited = *remaining > 0 && matches!(method.as_str(), "SendMessage" | "SendAnimation");
        if limited {
            *remaining -= 1;
        }
        limited
    };
    match method.as_str() {
        _ if rate_limited => Json(json!({
            "ok": false,
            "error_code": 429,
            "description": "Too Many Requests: retry after 1",
            "parameters": { "retry_after": 1 }
        })),
        "SendMessage" | "SendAnimation" if failing => Json(json!({
            "ok": false,
            "error_code": 403,
            "description": "Forbidden: bot was blocked by the user"
        })),
        "SendMessage" | "SendAnimation" => Json(json!({ "ok": true, "result": message_result(chat_id) })),
        "EditMessageText" if *state.not_modified.lock().expect("lock") => Json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: message is not modified: specified new message content and reply markup are exactly the same as a current content and reply markup of the message"
        })),
        "EditMessageText" => Json(json!({ "ok": true, "result": message_result(chat_id) })),
        _ => Json(json!({ "ok": true, "result": true })),
    }
}
