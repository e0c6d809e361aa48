//! Shared fixtures for unit tests: an in-memory fake server and sample records.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use crate::error::ApiError;
use crate::net::api::ApiClient;
use crate::net::transport::{ApiRequest, ApiResponse, HttpTransport};
use crate::net::types::{Board, Session, Task, TaskStatus, User};

/// Replays canned responses in order and records every request it sees.
#[derive(Default)]
pub struct FakeServer {
    responses: Mutex<VecDeque<Result<ApiResponse, ApiError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeServer {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a response with `status` and JSON `body`.
    pub fn respond(&self, status: u16, body: Value) {
        self.responses.lock().unwrap().push_back(Ok(ApiResponse::new(status, body)));
    }

    /// Queue a 2xx with `body`.
    pub fn ok(&self, body: Value) {
        self.respond(200, body);
    }

    /// Queue an error response carrying a server `message`.
    pub fn fail(&self, status: u16, message: &str) {
        self.respond(status, json!({ "message": message }));
    }

    /// Queue a connection-level failure.
    pub fn drop_connection(&self) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(ApiError::Transport("connection reset".into())));
    }

    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    #[must_use]
    pub fn last_request(&self) -> ApiRequest {
        self.requests.lock().unwrap().last().cloned().expect("no request recorded")
    }
}

#[async_trait::async_trait]
impl HttpTransport for FakeServer {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::new(599, json!({ "message": "no canned response" }))))
    }
}

#[must_use]
pub fn api(server: &Arc<FakeServer>) -> ApiClient<Arc<FakeServer>> {
    ApiClient::new(Arc::clone(server), "/api")
}

#[must_use]
pub fn session() -> Session {
    Session::new(user(), "T".to_owned())
}

#[must_use]
pub fn user() -> User {
    User { id: "1".to_owned(), username: "a".to_owned(), email: Some("a@b.com".to_owned()) }
}

#[must_use]
pub fn board(id: &str, name: &str) -> Board {
    Board { id: id.to_owned(), name: name.to_owned(), description: format!("{name} description") }
}

#[must_use]
pub fn task(id: &str, board_id: &str, status: TaskStatus) -> Task {
    Task {
        id: id.to_owned(),
        name: format!("task {id}"),
        description: String::new(),
        status,
        icon: String::new(),
        board_id: board_id.to_owned(),
    }
}
