//! Board/task store: cached board list, selected board, and its tasks.
//!
//! DESIGN
//! ======
//! Request first, reconcile second. Every mutation waits for the server to
//! acknowledge it before touching the cache, and then patches the cache
//! with exactly what was sent or returned (no re-fetch). A failed call
//! leaves every cached field as it was and records a display message, so
//! there is never anything to roll back.
//!
//! Overlapping calls are not ordered: whichever response is reconciled
//! last wins. The `loading` flag is advisory for views and does not block
//! a second call.

#[cfg(test)]
#[path = "board_test.rs"]
mod board_test;

use tracing::{info, warn};

use super::columns::{StatusColumns, group_by_status};
use crate::error::ApiError;
use crate::net::api::ApiClient;
use crate::net::transport::HttpTransport;
use crate::net::types::{Board, NewTask, Session, Task, TaskUpdate};

pub const FETCH_BOARDS_FAILED: &str = "Failed to fetch boards";
pub const CREATE_BOARD_FAILED: &str = "Failed to create board";
pub const FETCH_BOARD_FAILED: &str = "Failed to fetch board";
pub const UPDATE_BOARD_FAILED: &str = "Failed to update board";
pub const DELETE_BOARD_FAILED: &str = "Failed to delete board";
pub const CREATE_TASK_FAILED: &str = "Failed to create task";
pub const UPDATE_TASK_FAILED: &str = "Failed to update task";
pub const DELETE_TASK_FAILED: &str = "Failed to delete task";

pub struct BoardStore<T> {
    api: ApiClient<T>,
    /// Board currently open, with its tasks in `tasks`.
    board: Option<Board>,
    /// Sidebar summaries of every board the user owns.
    boards: Vec<Board>,
    tasks: Vec<Task>,
    loading: bool,
    error: Option<String>,
}

impl<T: HttpTransport> BoardStore<T> {
    pub fn new(api: ApiClient<T>) -> Self {
        Self { api, board: None, boards: Vec::new(), tasks: Vec::new(), loading: false, error: None }
    }

    #[must_use]
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    #[must_use]
    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks split into status columns, recomputed on every call.
    #[must_use]
    pub fn columns(&self) -> StatusColumns<'_> {
        group_by_status(&self.tasks)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Forget everything cached, e.g. after the user signs out.
    pub fn reset(&mut self) {
        self.board = None;
        self.boards.clear();
        self.tasks.clear();
        self.loading = false;
        self.error = None;
    }

    // =========================================================================
    // BOARDS
    // =========================================================================

    /// Replace the board list with the server's.
    pub async fn get_all_boards(&mut self, session: &Session) -> bool {
        self.begin();
        match self.api.list_boards(session).await {
            Ok(boards) => {
                self.boards = boards;
                self.loading = false;
                true
            }
            Err(e) => self.fail(FETCH_BOARDS_FAILED, &e),
        }
    }

    /// Create a board and append it to the list. Returns the new board id.
    ///
    /// The appended entry holds the caller's `name` and `description`; any
    /// server-side defaulting shows up only after the next full fetch.
    pub async fn create_board(&mut self, session: &Session, name: &str, description: &str) -> Option<String> {
        self.begin();
        match self.api.create_board(session, name, description).await {
            Ok(id) => {
                info!(board_id = %id, "board created");
                self.boards.push(Board { id: id.clone(), name: name.to_owned(), description: description.to_owned() });
                self.loading = false;
                Some(id)
            }
            Err(e) => {
                self.fail(CREATE_BOARD_FAILED, &e);
                None
            }
        }
    }

    /// Load one board and replace both the selection and the task list.
    pub async fn get_board(&mut self, session: &Session, board_id: &str) -> bool {
        self.begin();
        match self.api.get_board(session, board_id).await {
            Ok(detail) => {
                let mut tasks = detail.tasks;
                for task in tasks.iter_mut().filter(|t| t.board_id.is_empty()) {
                    task.board_id.clone_from(&detail.board.id);
                }
                self.board = Some(detail.board);
                self.tasks = tasks;
                self.loading = false;
                true
            }
            Err(e) => self.fail(FETCH_BOARD_FAILED, &e),
        }
    }

    /// Rename/redescribe a board, then patch the selection (if it is that
    /// board) and its list entry with the values sent.
    pub async fn update_board(&mut self, session: &Session, board_id: &str, name: &str, description: &str) -> bool {
        self.begin();
        if let Err(e) = self.api.update_board(session, board_id, name, description).await {
            return self.fail(UPDATE_BOARD_FAILED, &e);
        }

        let selected = self.board.iter_mut().filter(|b| b.id == board_id);
        for board in selected.chain(self.boards.iter_mut().filter(|b| b.id == board_id)) {
            name.clone_into(&mut board.name);
            description.clone_into(&mut board.description);
        }
        info!(%board_id, "board updated");
        self.loading = false;
        true
    }

    /// Delete a board, dropping it from the list and from the selection.
    ///
    /// Cached tasks whose `board_id` matches are dropped too, since the
    /// server deletes a board's tasks along with it.
    pub async fn delete_board(&mut self, session: &Session, board_id: &str) -> bool {
        self.begin();
        if let Err(e) = self.api.delete_board(session, board_id).await {
            return self.fail(DELETE_BOARD_FAILED, &e);
        }

        self.boards.retain(|b| b.id != board_id);
        if self.board.as_ref().is_some_and(|b| b.id == board_id) {
            self.board = None;
        }
        // The server deletes a board's tasks with it.
        self.tasks.retain(|t| t.board_id != board_id);
        info!(%board_id, "board deleted");
        self.loading = false;
        true
    }

    // =========================================================================
    // TASKS
    // =========================================================================

    /// Create a task and append it to the task list. Returns the new task id.
    ///
    /// `task.board_id` is not checked against the open board.
    pub async fn create_task(&mut self, session: &Session, task: NewTask) -> Option<String> {
        self.begin();
        match self.api.create_task(session, &task).await {
            Ok(id) => {
                info!(task_id = %id, board_id = %task.board_id, "task created");
                self.tasks.push(task.into_task(id.clone()));
                self.loading = false;
                Some(id)
            }
            Err(e) => {
                self.fail(CREATE_TASK_FAILED, &e);
                None
            }
        }
    }

    /// Send a partial update, then merge it into the cached task.
    pub async fn update_task(&mut self, session: &Session, task_id: &str, update: &TaskUpdate) -> bool {
        self.begin();
        if let Err(e) = self.api.update_task(session, task_id, update).await {
            return self.fail(UPDATE_TASK_FAILED, &e);
        }

        for task in self.tasks.iter_mut().filter(|t| t.id == task_id) {
            update.apply_to(task);
        }
        info!(%task_id, "task updated");
        self.loading = false;
        true
    }

    pub async fn delete_task(&mut self, session: &Session, task_id: &str) -> bool {
        self.begin();
        if let Err(e) = self.api.delete_task(session, task_id).await {
            return self.fail(DELETE_TASK_FAILED, &e);
        }

        self.tasks.retain(|t| t.id != task_id);
        info!(%task_id, "task deleted");
        self.loading = false;
        true
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn fail(&mut self, fallback: &str, err: &ApiError) -> bool {
        warn!(error = %err, "{fallback}");
        self.error = Some(err.user_message(fallback));
        self.loading = false;
        false
    }
}
