//! Task storage contract and the in-memory backend.
//!
//! The service only talks to storage through [`TaskStore`], so a remote
//! backend can be swapped in without touching validation or HTTP code.

use crate::error::StoreError;
use crate::types::{Task, TaskId};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Boxed future returned by every [`TaskStore`] operation
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// In-place change applied to a stored task
pub type TaskMutator = Box<dyn FnOnce(&mut Task) + Send>;

/// Selects tasks for bulk deletion
pub type TaskPredicate = Box<dyn Fn(&Task) -> bool + Send + Sync>;

/// Storage for task records.
///
/// Tasks are kept newest first: `insert` puts a task at the front and `scan`
/// returns that order.
///
/// # Dyn Compatibility
///
/// Methods return boxed futures instead of using `async fn` so the service can
/// hold an `Arc<dyn TaskStore>`.
pub trait TaskStore: Send + Sync {
    /// Store a new task at the front.
    ///
    /// # Errors
    ///
    /// `Duplicate` if the id is taken, `Backend` on storage failure.
    fn insert(&self, task: Task) -> StoreFuture<'_, ()>;

    /// Look up a task by id.
    ///
    /// # Errors
    ///
    /// `Backend` on storage failure.
    fn find(&self, id: TaskId) -> StoreFuture<'_, Option<Task>>;

    /// Apply `mutator` to the task with `id` atomically.
    ///
    /// Returns the updated task, or `None` if no task has this id.
    ///
    /// # Errors
    ///
    /// `Backend` on storage failure.
    fn update(&self, id: TaskId, mutator: TaskMutator) -> StoreFuture<'_, Option<Task>>;

    /// Delete the task with `id`; returns whether it existed.
    ///
    /// # Errors
    ///
    /// `Backend` on storage failure.
    fn delete(&self, id: TaskId) -> StoreFuture<'_, bool>;

    /// Every task, newest first.
    ///
    /// # Errors
    ///
    /// `Backend` on storage failure.
    fn scan(&self) -> StoreFuture<'_, Vec<Task>>;

    /// Delete every task matching `predicate`; returns how many were removed.
    ///
    /// # Errors
    ///
    /// `Backend` on storage failure.
    fn delete_where(&self, predicate: TaskPredicate) -> StoreFuture<'_, usize>;
}

/// In-memory [`TaskStore`]
///
/// Cloning yields another handle to the same list. Every operation takes the
/// lock once, so read-modify-write updates never interleave.
#[derive(Clone, Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: Arc<RwLock<Vec<Task>>>,
}

impl InMemoryTaskStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `tasks` in the given (newest-first) order
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Arc::new(RwLock::new(tasks)),
        }
    }

    /// Number of stored tasks
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    /// Returns true if nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }
}

impl TaskStore for InMemoryTaskStore {
    fn insert(&self, task: Task) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let mut tasks = self.tasks.write().await;
            if tasks.iter().any(|t| t.id == task.id) {
                return Err(StoreError::Duplicate(task.id));
            }
            tasks.insert(0, task);
            Ok(())
        })
    }

    fn find(&self, id: TaskId) -> StoreFuture<'_, Option<Task>> {
        Box::pin(async move {
            let tasks = self.tasks.read().await;
            Ok(tasks.iter().find(|t| t.id == id).cloned())
        })
    }

    fn update(&self, id: TaskId, mutator: TaskMutator) -> StoreFuture<'_, Option<Task>> {
        Box::pin(async move {
            let mut tasks = self.tasks.write().await;
            Ok(tasks.iter_mut().find(|t| t.id == id).map(|task| {
                mutator(task);
                task.clone()
            }))
        })
    }

    fn delete(&self, id: TaskId) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            let mut tasks = self.tasks.write().await;
            let before = tasks.len();
            tasks.retain(|t| t.id != id);
            Ok(tasks.len() != before)
        })
    }

    fn scan(&self) -> StoreFuture<'_, Vec<Task>> {
        Box::pin(async move { Ok(self.tasks.read().await.clone()) })
    }

    fn delete_where(&self, predicate: TaskPredicate) -> StoreFuture<'_, usize> {
        Box::pin(async move {
            let mut tasks = self.tasks.write().await;
            let before = tasks.len();
            tasks.retain(|t| !predicate(t));
            Ok(before - tasks.len())
        })
    }
}
