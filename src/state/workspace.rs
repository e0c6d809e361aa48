//! Board page flows built on top of `BoardStore`.
//!
//! SYSTEM CONTEXT
//! ==============
//! The board page opens in one of three ways: a brand-new account gets a
//! starter board, a bare `/` jumps to the first board, and `/board/:id`
//! loads that board. After a delete the page moves to a surviving board.

#[cfg(test)]
#[path = "workspace_test.rs"]
mod workspace_test;

use tracing::info;

use super::board::BoardStore;
use super::route::Route;
use crate::net::transport::HttpTransport;
use crate::net::types::{Board, Session};

pub const DEFAULT_BOARD_NAME: &str = "My First Board";
pub const DEFAULT_BOARD_DESCRIPTION: &str = "My task collection";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The requested board and its tasks are now in the store.
    Loaded,
    /// The page should navigate elsewhere and open again.
    Redirect(Route),
    /// A request failed; the store's `error()` says why.
    Failed,
}

impl<T: HttpTransport> BoardStore<T> {
    /// Refresh the board list, then open `requested` or decide where to go.
    pub async fn open(&mut self, session: &Session, requested: Option<&str>) -> OpenOutcome {
        if !self.get_all_boards(session).await {
            return OpenOutcome::Failed;
        }

        if self.boards().is_empty() {
            info!("no boards yet, creating starter board");
            return match self.create_board(session, DEFAULT_BOARD_NAME, DEFAULT_BOARD_DESCRIPTION).await {
                Some(id) => OpenOutcome::Redirect(Route::Board(Some(id))),
                None => OpenOutcome::Failed,
            };
        }

        match requested {
            Some(board_id) => {
                if self.get_board(session, board_id).await {
                    OpenOutcome::Loaded
                } else {
                    OpenOutcome::Failed
                }
            }
            None => OpenOutcome::Redirect(Route::Board(self.boards().first().map(|b| b.id.clone()))),
        }
    }
}

/// Where to go once `deleted` is gone: another listed board, else the root.
#[must_use]
pub fn route_after_delete(boards: &[Board], deleted: &str) -> Route {
    Route::Board(boards.iter().find(|b| b.id != deleted).map(|b| b.id.clone()))
}

/// The name as typed, or `None` if it is blank. Blank names never reach the
/// server; non-blank ones are sent untouched.
#[must_use]
pub fn validate_name(raw: &str) -> Option<&str> {
    if raw.trim().is_empty() { None } else { Some(raw) }
}
