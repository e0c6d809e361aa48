//! Wire DTOs for the task board `/api`.
//!
//! DESIGN
//! ======
//! Field names follow the server's JSON exactly (`board_id`, `task_id`).
//! Identifiers are kept as strings; the server hands out UUID strings for
//! boards and tasks, but user ids have shown up as integers, so id fields
//! accept either and normalize to a string. Nullable text columns
//! (`description`, `icon`) decode to empty strings.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// IDENTITY
// =============================================================================

/// The authenticated user as returned by `POST /user/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Authenticated identity plus the bearer token every board/task request carries.
///
/// Token and user are always set together; there is no way to build a
/// session with one and not the other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    user: User,
    token: String,
}

impl Session {
    #[must_use]
    pub fn new(user: User, token: String) -> Self {
        Self { user, token }
    }

    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.user.username
    }

    #[must_use]
    pub fn bearer_token(&self) -> &str {
        &self.token
    }
}

// =============================================================================
// BOARDS AND TASKS
// =============================================================================

/// A board, used both for the sidebar summary list and the selected board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_string_or_null")]
    pub description: String,
}

/// Column a task sits in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
    #[serde(rename = "Won't do", alias = "Won't Do")]
    WontDo,
}

impl TaskStatus {
    /// Every status, in board column order.
    pub const ALL: [TaskStatus; 3] = [TaskStatus::InProgress, TaskStatus::Completed, TaskStatus::WontDo];

    /// Wire string and column title.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::WontDo => "Won't do",
        }
    }

    /// Accent color for the column header.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::InProgress => "#4a6de5",
            Self::Completed => "#2ecc71",
            Self::WontDo => "#e74c3c",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    /// Accepts wire labels plus the short forms used on the command line.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let key: String = raw.chars().filter(char::is_ascii_alphanumeric).collect::<String>().to_ascii_lowercase();
        match key.as_str() {
            "inprogress" | "progress" => Ok(Self::InProgress),
            "completed" | "done" => Ok(Self::Completed),
            "wontdo" | "wont" => Ok(Self::WontDo),
            _ => Err(format!("unknown task status: {raw}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_string_or_null")]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "deserialize_string_or_null")]
    pub icon: String,
    /// Empty when the server omitted it; the board store fills it in.
    #[serde(default, deserialize_with = "deserialize_string_or_null")]
    pub board_id: String,
}

/// Partial task edit sent to `PUT /tasks/:id`. Absent fields are left alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl TaskUpdate {
    #[must_use]
    pub fn status(status: TaskStatus) -> Self {
        Self { status: Some(status), ..Self::default() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.status.is_none() && self.icon.is_none()
    }

    /// Merge the present fields into `task`, leaving every other field untouched.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(name) = &self.name {
            task.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            task.description.clone_from(description);
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(icon) = &self.icon {
            task.icon.clone_from(icon);
        }
    }
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SignupRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Body for both `POST /boards` and `PUT /boards/:id`.
#[derive(Debug, Serialize)]
pub struct BoardFields<'a> {
    pub name: &'a str,
    pub description: &'a str,
}

/// Fields a caller supplies when creating a task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub name: String,
    pub description: String,
    pub status: TaskStatus,
    pub icon: String,
    pub board_id: String,
}

impl NewTask {
    /// A task with empty description and icon in the default column.
    #[must_use]
    pub fn named(name: impl Into<String>, board_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            status: TaskStatus::default(),
            icon: String::new(),
            board_id: board_id.into(),
        }
    }

    /// Cache record for this task once the server has assigned `id`.
    #[must_use]
    pub fn into_task(self, id: String) -> Task {
        Task {
            id,
            name: self.name,
            description: self.description,
            status: self.status,
            icon: self.icon,
            board_id: self.board_id,
        }
    }
}

// =============================================================================
// RESPONSE BODIES
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct BoardListResponse {
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub boards: Vec<Board>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBoardResponse {
    #[serde(deserialize_with = "deserialize_id")]
    pub board_id: String,
}

#[derive(Debug, Deserialize)]
pub struct BoardDetailResponse {
    pub board: Board,
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskResponse {
    #[serde(deserialize_with = "deserialize_id")]
    pub task_id: String,
}

/// Shape of every error body the server sends.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// SERDE HELPERS
// =============================================================================

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("expected string or integer id, got {other}"))),
    }
}

fn deserialize_string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_vec_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
