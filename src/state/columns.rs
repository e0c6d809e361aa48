//! Status columns: the cached task list split by `TaskStatus`.
//!
//! Derived on read from the board store's task list and never stored, so
//! there is nothing to keep in sync. Each task lands in exactly one column,
//! chosen by its `status` alone; order within a column follows the cache.

#[cfg(test)]
#[path = "columns_test.rs"]
mod columns_test;

use crate::net::types::{Task, TaskStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusColumns<'a> {
    in_progress: Vec<&'a Task>,
    completed: Vec<&'a Task>,
    wont_do: Vec<&'a Task>,
}

/// Group `tasks` into the three board columns.
#[must_use]
pub fn group_by_status(tasks: &[Task]) -> StatusColumns<'_> {
    let mut columns = StatusColumns { in_progress: Vec::new(), completed: Vec::new(), wont_do: Vec::new() };
    for task in tasks {
        columns.column_mut(task.status).push(task);
    }
    columns
}

impl<'a> StatusColumns<'a> {
    #[must_use]
    pub fn get(&self, status: TaskStatus) -> &[&'a Task] {
        match status {
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Completed => &self.completed,
            TaskStatus::WontDo => &self.wont_do,
        }
    }

    /// Columns in board order, empty ones included.
    pub fn iter(&self) -> impl Iterator<Item = (TaskStatus, &[&'a Task])> + '_ {
        TaskStatus::ALL.into_iter().map(|status| (status, self.get(status)))
    }

    /// Total number of tasks across all columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.in_progress.len() + self.completed.len() + self.wont_do.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn column_mut(&mut self, status: TaskStatus) -> &mut Vec<&'a Task> {
        match status {
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::Completed => &mut self.completed,
            TaskStatus::WontDo => &mut self.wont_do,
        }
    }
}
