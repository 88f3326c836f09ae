//! Task list controller: client-side state, optimistic updates and rollback.
//!
//! [`TaskListReducer`] runs inside a runtime [`Store`](tasklist_runtime::Store).
//! Create, toggle and remove change the local list at once and send the
//! request in an effect; a failure undoes that one change and shows an
//! error, leaving everything confirmed in the meantime alone. A task with a
//! toggle in flight accepts no further toggle or remove until it settles.
//! Clear-completed waits for the server before touching the list.
//!
//! Every error bumps [`TaskListState::error_seq`] and schedules
//! [`TaskListAction::DismissError`] for that number after the configured TTL
//! under [`DISMISS_ERROR_EFFECT`]. Scheduling replaces the previous timer,
//! and a dismissal for an older number is ignored even if its timer already
//! fired.

use crate::api::{load_tasks, TaskApi};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tasklist_core::effect::Effect;
use tasklist_core::environment::{Clock, IdGenerator};
use tasklist_core::reducer::Reducer;
use tasklist_core::{async_effect, cancellable, delay, smallvec, SmallVec};
use tasklist_macros::Action;
use tasklist_tasks::{validate_title, Filter, Task, TaskId};

/// Effect id of the error auto-dismiss timer
pub const DISMISS_ERROR_EFFECT: &str = "task-list/dismiss-error";

/// Whether the initial list has arrived
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first list
    #[default]
    Loading,
    /// List shown, accepting commands
    Ready,
}

/// Client-side task list state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskListState {
    /// Tasks, newest first, including optimistic placeholders
    pub tasks: Vec<Task>,
    /// Current view filter
    pub filter: Filter,
    /// Loading or ready
    pub phase: Phase,
    /// Message shown to the user until dismissed
    pub error: Option<String>,
    /// Number of the error currently shown; bumped on every new error
    pub error_seq: u64,
    /// Local ids of placeholders still waiting for their server id
    pub pending: HashSet<TaskId>,
    /// Server ids of tasks with a toggle in flight
    pub saving: HashSet<TaskId>,
}

impl TaskListState {
    /// Ready state holding `tasks`
    #[must_use]
    pub fn ready(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            phase: Phase::Ready,
            ..Self::default()
        }
    }

    /// Tasks the current filter lets through, in list order
    #[must_use]
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| self.filter.matches(task))
            .collect()
    }

    /// Number of tasks not yet completed, whatever the filter
    #[must_use]
    pub fn items_left(&self) -> usize {
        self.tasks.iter().filter(|task| !task.completed).count()
    }

    /// Whether the initial load is still in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Looks up a task by id
    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    /// Whether a request for this task is still in flight
    #[must_use]
    pub fn is_saving(&self, id: &TaskId) -> bool {
        self.pending.contains(id) || self.saving.contains(id)
    }

    /// A task the server knows about with nothing in flight for it
    fn is_settled(&self, id: &TaskId) -> bool {
        self.task(id).is_some() && !self.is_saving(id)
    }
}

/// Controller actions
///
/// Intents come from the user; outcomes are fed back by request effects.
#[derive(Action, Clone, Debug, PartialEq, Eq)]
pub enum TaskListAction {
    /// Fetch the list from the service
    #[intent]
    Load,
    /// List arrived (failures already degraded to empty)
    #[outcome]
    Loaded {
        /// Tasks from the service
        tasks: Vec<Task>,
    },

    /// Add a task
    #[intent]
    Create {
        /// Raw title as typed
        title: String,
    },
    /// Server accepted a create
    #[outcome]
    Created {
        /// Placeholder id to replace
        local_id: TaskId,
        /// Task as stored by the server
        task: Task,
    },
    /// Server rejected a create
    #[outcome]
    CreateFailed {
        /// Placeholder id to drop
        local_id: TaskId,
        /// Message to show
        error: String,
    },

    /// Flip completion of a task
    #[intent]
    Toggle {
        /// Task to flip
        id: TaskId,
    },
    /// Server confirmed a toggle
    #[outcome]
    Toggled {
        /// Task as stored by the server
        task: Task,
    },
    /// Server rejected a toggle
    #[outcome]
    ToggleFailed {
        /// Task as it was before the optimistic flip
        prior: Task,
        /// Message to show
        error: String,
    },

    /// Delete a task
    #[intent]
    Remove {
        /// Task to delete
        id: TaskId,
    },
    /// Server confirmed a delete
    #[outcome]
    Removed {
        /// Deleted task
        id: TaskId,
    },
    /// Server rejected a delete
    #[outcome]
    RemoveFailed {
        /// Task as it was before the optimistic removal
        prior: Task,
        /// Where it sat in the list
        index: usize,
        /// Message to show
        error: String,
    },

    /// Delete every completed task
    #[intent]
    ClearCompleted,
    /// Server deleted completed tasks
    #[outcome]
    ClearedCompleted {
        /// How many the server deleted
        removed: usize,
    },
    /// Server rejected clear-completed
    #[outcome]
    ClearCompletedFailed {
        /// Message to show
        error: String,
    },

    /// Change which tasks are shown
    SetFilter {
        /// New filter
        filter: Filter,
    },
    /// Hide the error message numbered `seq`, if it is still the one shown
    DismissError {
        /// [`TaskListState::error_seq`] of the message to hide
        seq: u64,
    },
}

/// Dependencies of [`TaskListReducer`]
#[derive(Clone)]
pub struct TaskListEnvironment {
    /// Task service adapter
    pub api: Arc<dyn TaskApi>,
    /// Timestamps for placeholders
    pub clock: Arc<dyn Clock>,
    /// Seeds for placeholder ids
    pub ids: Arc<dyn IdGenerator>,
    /// How long an error stays visible
    pub error_ttl: Duration,
}

impl TaskListEnvironment {
    /// Creates an environment with the default 3 s error TTL
    #[must_use]
    pub fn new(api: Arc<dyn TaskApi>, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            api,
            clock,
            ids,
            error_ttl: Duration::from_secs(3),
        }
    }

    /// Overrides the error TTL
    #[must_use]
    pub const fn with_error_ttl(mut self, error_ttl: Duration) -> Self {
        self.error_ttl = error_ttl;
        self
    }
}

impl std::fmt::Debug for TaskListEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskListEnvironment")
            .field("error_ttl", &self.error_ttl)
            .finish_non_exhaustive()
    }
}

/// Reducer for the client-side task list
#[derive(Clone, Debug, Default)]
pub struct TaskListReducer;

impl TaskListReducer {
    /// Creates a new `TaskListReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Show `message` and (re)start the dismiss timer
    fn show_error(
        state: &mut TaskListState,
        message: String,
        env: &TaskListEnvironment,
    ) -> SmallVec<[Effect<TaskListAction>; 4]> {
        state.error_seq = state.error_seq.wrapping_add(1);
        tracing::debug!(%message, seq = state.error_seq, "Showing error");
        state.error = Some(message);
        smallvec![cancellable! {
            id: DISMISS_ERROR_EFFECT,
            effect: delay! {
                duration: env.error_ttl,
                action: TaskListAction::DismissError { seq: state.error_seq }
            }
        }]
    }
}

impl Reducer for TaskListReducer {
    type State = TaskListState;
    type Action = TaskListAction;
    type Environment = TaskListEnvironment;

    #[allow(clippy::too_many_lines)] // one arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        tracing::trace!(action = action.name(), "Reducing task list action");

        match action {
            // ========== Load ==========
            TaskListAction::Load => {
                state.phase = Phase::Loading;
                let api = Arc::clone(&env.api);
                smallvec![async_effect! {
                    Some(TaskListAction::Loaded { tasks: load_tasks(api.as_ref()).await })
                }]
            },
            TaskListAction::Loaded { tasks } => {
                // Creates still in flight stay on top of the fresh list
                let mut merged: Vec<Task> = state
                    .tasks
                    .iter()
                    .filter(|task| state.pending.contains(&task.id))
                    .cloned()
                    .collect();
                merged.extend(tasks);
                state.tasks = merged;
                state.phase = Phase::Ready;
                SmallVec::new()
            },

            // ========== Create ==========
            TaskListAction::Create { title } => {
                let title = match validate_title(&title) {
                    Ok(title) => title,
                    Err(error) => return Self::show_error(state, error.to_string(), env),
                };

                let local_id = TaskId::local(env.ids.next_id());
                state
                    .tasks
                    .insert(0, Task::new(local_id.clone(), title.clone(), env.clock.now()));
                state.pending.insert(local_id.clone());

                let api = Arc::clone(&env.api);
                smallvec![async_effect! {
                    Some(match api.create(title).await {
                        Ok(task) => TaskListAction::Created { local_id, task },
                        Err(error) => TaskListAction::CreateFailed {
                            local_id,
                            error: format!("Could not add task: {error}"),
                        },
                    })
                }]
            },
            TaskListAction::Created { local_id, task } => {
                state.pending.remove(&local_id);
                match state.tasks.iter_mut().find(|t| t.id == local_id) {
                    Some(placeholder) => *placeholder = task,
                    // Placeholder already gone; the server still has the task
                    None => state.tasks.insert(0, task),
                }
                SmallVec::new()
            },
            TaskListAction::CreateFailed { local_id, error } => {
                state.pending.remove(&local_id);
                state.tasks.retain(|t| t.id != local_id);
                Self::show_error(state, error, env)
            },

            // ========== Toggle ==========
            TaskListAction::Toggle { id } => {
                if !state.is_settled(&id) {
                    tracing::debug!(task_id = %id, "Ignoring toggle of unknown or busy task");
                    return SmallVec::new();
                }
                let Some(task) = state.tasks.iter_mut().find(|t| t.id == id) else {
                    return SmallVec::new();
                };

                let prior = task.clone();
                task.toggle();
                state.saving.insert(id.clone());

                let api = Arc::clone(&env.api);
                smallvec![async_effect! {
                    Some(match api.toggle(id).await {
                        Ok(task) => TaskListAction::Toggled { task },
                        Err(error) => TaskListAction::ToggleFailed {
                            prior,
                            error: format!("Could not update task: {error}"),
                        },
                    })
                }]
            },
            TaskListAction::Toggled { task } => {
                state.saving.remove(&task.id);
                if let Some(local) = state.tasks.iter_mut().find(|t| t.id == task.id) {
                    *local = task;
                }
                SmallVec::new()
            },
            TaskListAction::ToggleFailed { prior, error } => {
                state.saving.remove(&prior.id);
                // Only the flag goes back; a task dropped meanwhile stays dropped
                if let Some(local) = state.tasks.iter_mut().find(|t| t.id == prior.id) {
                    local.completed = prior.completed;
                }
                Self::show_error(state, error, env)
            },

            // ========== Remove ==========
            TaskListAction::Remove { id } => {
                if !state.is_settled(&id) {
                    tracing::debug!(task_id = %id, "Ignoring removal of unknown or busy task");
                    return SmallVec::new();
                }
                let Some(index) = state.tasks.iter().position(|t| t.id == id) else {
                    return SmallVec::new();
                };

                let prior = state.tasks.remove(index);

                let api = Arc::clone(&env.api);
                smallvec![async_effect! {
                    Some(match api.remove(id.clone()).await {
                        Ok(()) => TaskListAction::Removed { id },
                        Err(error) => TaskListAction::RemoveFailed {
                            prior,
                            index,
                            error: format!("Could not delete task: {error}"),
                        },
                    })
                }]
            },
            TaskListAction::Removed { id } => {
                // Already gone locally unless a reload brought it back
                state.tasks.retain(|t| t.id != id);
                SmallVec::new()
            },
            TaskListAction::RemoveFailed { prior, index, error } => {
                // A reload may already have brought it back
                if state.task(&prior.id).is_none() {
                    let index = index.min(state.tasks.len());
                    state.tasks.insert(index, prior);
                }
                Self::show_error(state, error, env)
            },

            // ========== Clear completed ==========
            TaskListAction::ClearCompleted => {
                let api = Arc::clone(&env.api);
                smallvec![async_effect! {
                    Some(match api.clear_completed().await {
                        Ok(removed) => TaskListAction::ClearedCompleted { removed },
                        Err(error) => TaskListAction::ClearCompletedFailed {
                            error: format!("Could not clear completed tasks: {error}"),
                        },
                    })
                }]
            },
            TaskListAction::ClearedCompleted { removed } => {
                tracing::debug!(removed, "Server cleared completed tasks");
                state.tasks.retain(|t| !t.completed);
                SmallVec::new()
            },
            TaskListAction::ClearCompletedFailed { error } => Self::show_error(state, error, env),

            // ========== Local ==========
            TaskListAction::SetFilter { filter } => {
                state.filter = filter;
                SmallVec::new()
            },
            TaskListAction::DismissError { seq } => {
                if seq == state.error_seq {
                    state.error = None;
                } else {
                    tracing::trace!(seq, current = state.error_seq, "Ignoring stale dismissal");
                }
                SmallVec::new()
            },
        }
    }
}
