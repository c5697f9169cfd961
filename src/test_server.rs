//! In-process stand-in for the site backend, used by unit tests.

use axum::{
    extract::State,
    http::{ header, HeaderMap, StatusCode, Uri },
    response::{ IntoResponse, Response },
    Router,
};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::{ Arc, Mutex };
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Recorded {
    pub path: String,
    pub csrf: Option<String>,
    pub body: JsonValue,
}

#[derive(Clone, Debug)]
pub struct StubReply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
    pub set_cookie: Option<String>,
}

impl StubReply {
    pub fn json(body: JsonValue) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            delay: Duration::ZERO,
            set_cookie: None,
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
            set_cookie: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_cookie(mut self, cookie: &str) -> Self {
        self.set_cookie = Some(cookie.to_string());
        self
    }
}

#[derive(Clone, Default)]
struct StubState {
    replies: Arc<Mutex<HashMap<String, StubReply>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

pub struct StubBackend {
    pub base_url: String,
    state: StubState,
}

impl StubBackend {
    pub async fn start() -> Self {
        let state = StubState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Base URL of a port nothing listens on.
    pub async fn unreachable_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    pub fn reply(&self, path: &str, reply: StubReply) {
        self.state.replies.lock().unwrap().insert(path.to_string(), reply);
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.state.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }
}

async fn handle(
    State(state): State<StubState>,
    uri: Uri,
    headers: HeaderMap,
    body: String
) -> Response {
    let path = uri.path().to_string();
    state.requests.lock().unwrap().push(Recorded {
        path: path.clone(),
        csrf: headers
            .get("x-csrftoken")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_str(&body).unwrap_or(JsonValue::Null),
    });

    let reply = state.replies.lock().unwrap().get(&path).cloned();
    let Some(reply) = reply else {
        return (StatusCode::NOT_FOUND, "not found").into_response();
    };
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    let status = StatusCode::from_u16(reply.status).unwrap();
    let mut response = (status, [(header::CONTENT_TYPE, "application/json")], reply.body).into_response();
    if let Some(cookie) = reply.set_cookie {
        response.headers_mut().insert(header::SET_COOKIE, cookie.parse().unwrap());
    }
    response
}
