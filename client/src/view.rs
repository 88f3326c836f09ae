//! Plain-text view model of the task list.

use crate::controller::TaskListState;
use std::fmt;
use tasklist_tasks::{Filter, TaskId};

/// One visible task
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskRow {
    /// 1-based position in the visible list
    pub number: usize,
    /// Task id, for mapping a number back to a task
    pub id: TaskId,
    /// Title
    pub title: String,
    /// Done?
    pub completed: bool,
    /// Created locally, not yet confirmed by the server
    pub saving: bool,
}

/// Everything the terminal front end prints
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskListView {
    /// Visible tasks, numbered from 1
    pub rows: Vec<TaskRow>,
    /// Active filter
    pub filter: Filter,
    /// Initial load still running
    pub loading: bool,
    /// Active task count across all filters
    pub items_left: usize,
    /// Error banner
    pub error: Option<String>,
}

impl TaskListView {
    /// Builds the view for `state`
    #[must_use]
    pub fn from_state(state: &TaskListState) -> Self {
        let rows = state
            .visible_tasks()
            .into_iter()
            .enumerate()
            .map(|(i, task)| TaskRow {
                number: i + 1,
                id: task.id.clone(),
                title: task.title.clone(),
                completed: task.completed,
                saving: state.is_saving(&task.id),
            })
            .collect();

        Self {
            rows,
            filter: state.filter,
            loading: state.is_loading(),
            items_left: state.items_left(),
            error: state.error.clone(),
        }
    }

    /// Id of the row numbered `number`
    #[must_use]
    pub fn id_at(&self, number: usize) -> Option<&TaskId> {
        self.rows
            .iter()
            .find(|row| row.number == number)
            .map(|row| &row.id)
    }
}

impl fmt::Display for TaskListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "To-Do List [{}]", self.filter)?;

        if self.loading {
            writeln!(f, "  Loading…")?;
        } else if self.rows.is_empty() {
            writeln!(f, "  Nothing to show")?;
        } else {
            for row in &self.rows {
                let mark = if row.completed { 'x' } else { ' ' };
                write!(f, "  {:>2}. [{mark}] {}", row.number, row.title)?;
                if row.saving {
                    write!(f, " (saving)")?;
                }
                writeln!(f)?;
            }
        }

        writeln!(f, "{} items left", self.items_left)?;
        if let Some(error) = &self.error {
            writeln!(f, "! {error}")?;
        }
        Ok(())
    }
}
