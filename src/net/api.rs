//! Typed wrappers for every `/api` endpoint.
//!
//! DESIGN
//! ======
//! One method per endpoint. Login and signup go out anonymously; every
//! board and task call takes the caller's `Session` and builds the
//! `Authorization: Bearer <token>` header for that request alone, so there
//! is no client-wide auth state to get out of sync with the session.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become `ApiError::Status` carrying the body's
//! `message` when present. A 2xx body that does not match the expected
//! shape is `ApiError::Decode`. Nothing is retried.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::transport::{ApiRequest, HttpTransport, Method};
use super::types::{
    Board, BoardDetailResponse, BoardFields, BoardListResponse, CreateBoardResponse, CreateTaskResponse, ErrorBody,
    LoginRequest, LoginResponse, NewTask, Session, SignupRequest, TaskUpdate,
};
use crate::error::ApiError;

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

pub const AUTHORIZATION: &str = "Authorization";

/// Header pair carrying `session`'s bearer token.
#[must_use]
pub fn bearer_header(session: &Session) -> (String, String) {
    (AUTHORIZATION.to_owned(), format!("Bearer {}", session.bearer_token()))
}

#[derive(Clone, Debug)]
pub struct ApiClient<T> {
    transport: T,
    prefix: String,
}

impl<T: HttpTransport> ApiClient<T> {
    /// `prefix` is prepended to every endpoint path (normally `/api`).
    pub fn new(transport: T, prefix: &str) -> Self {
        let prefix = prefix.trim_end_matches('/').to_owned();
        Self { transport, prefix }
    }

    // =========================================================================
    // USERS
    // =========================================================================

    /// `POST /user/login`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects the credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = encode(&LoginRequest { email, password })?;
        let request = ApiRequest::new(Method::Post, self.path("/user/login")).with_body(body);
        decode(self.call(request).await?)
    }

    /// `POST /user/signup`. Does not log the new user in.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects the signup.
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> Result<(), ApiError> {
        let body = encode(&SignupRequest { username, email, password })?;
        let request = ApiRequest::new(Method::Post, self.path("/user/signup")).with_body(body);
        self.call(request).await.map(drop)
    }

    // =========================================================================
    // BOARDS
    // =========================================================================

    /// `GET /boards`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a board list.
    pub async fn list_boards(&self, session: &Session) -> Result<Vec<Board>, ApiError> {
        let request = authorized(session, ApiRequest::new(Method::Get, self.path("/boards")));
        let list: BoardListResponse = decode(self.call(request).await?)?;
        Ok(list.boards)
    }

    /// `POST /boards`, returning the server-assigned board id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body lacks `board_id`.
    pub async fn create_board(&self, session: &Session, name: &str, description: &str) -> Result<String, ApiError> {
        let body = encode(&BoardFields { name, description })?;
        let request = authorized(session, ApiRequest::new(Method::Post, self.path("/boards")).with_body(body));
        let created: CreateBoardResponse = decode(self.call(request).await?)?;
        Ok(created.board_id)
    }

    /// `GET /boards/:id`, returning the board and its tasks.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    pub async fn get_board(&self, session: &Session, board_id: &str) -> Result<BoardDetailResponse, ApiError> {
        let path = self.path(&format!("/boards/{board_id}"));
        let request = authorized(session, ApiRequest::new(Method::Get, path));
        decode(self.call(request).await?)
    }

    /// `PUT /boards/:id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_board(
        &self,
        session: &Session,
        board_id: &str,
        name: &str,
        description: &str,
    ) -> Result<(), ApiError> {
        let body = encode(&BoardFields { name, description })?;
        let path = self.path(&format!("/boards/{board_id}"));
        let request = authorized(session, ApiRequest::new(Method::Put, path).with_body(body));
        self.call(request).await.map(drop)
    }

    /// `DELETE /boards/:id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_board(&self, session: &Session, board_id: &str) -> Result<(), ApiError> {
        let path = self.path(&format!("/boards/{board_id}"));
        let request = authorized(session, ApiRequest::new(Method::Delete, path));
        self.call(request).await.map(drop)
    }

    // =========================================================================
    // TASKS
    // =========================================================================

    /// `POST /tasks`, returning the server-assigned task id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body lacks `task_id`.
    pub async fn create_task(&self, session: &Session, task: &NewTask) -> Result<String, ApiError> {
        let body = encode(task)?;
        let request = authorized(session, ApiRequest::new(Method::Post, self.path("/tasks")).with_body(body));
        let created: CreateTaskResponse = decode(self.call(request).await?)?;
        Ok(created.task_id)
    }

    /// `PUT /tasks/:id` with only the fields present in `update`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_task(&self, session: &Session, task_id: &str, update: &TaskUpdate) -> Result<(), ApiError> {
        let body = encode(update)?;
        let path = self.path(&format!("/tasks/{task_id}"));
        let request = authorized(session, ApiRequest::new(Method::Put, path).with_body(body));
        self.call(request).await.map(drop)
    }

    /// `DELETE /tasks/:id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_task(&self, session: &Session, task_id: &str) -> Result<(), ApiError> {
        let path = self.path(&format!("/tasks/{task_id}"));
        let request = authorized(session, ApiRequest::new(Method::Delete, path));
        self.call(request).await.map(drop)
    }

    // =========================================================================
    // PLUMBING
    // =========================================================================

    fn path(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.prefix)
    }

    async fn call(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let method = request.method.as_str();
        let path = request.path.clone();
        debug!(%method, %path, "api request");

        let response = self.transport.send(request).await?;
        if response.is_success() {
            return Ok(response.body);
        }

        let message = serde_json::from_value::<ErrorBody>(response.body)
            .unwrap_or_default()
            .message;
        debug!(%method, %path, status = response.status, "api request rejected");
        Err(ApiError::Status { status: response.status, message })
    }
}

fn authorized(session: &Session, request: ApiRequest) -> ApiRequest {
    let (name, value) = bearer_header(session);
    request.with_header(name, value)
}

fn encode(body: &impl Serialize) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))
}

fn decode<R: DeserializeOwned>(body: Value) -> Result<R, ApiError> {
    serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}
