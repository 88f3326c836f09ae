//! Task service: validation and business rules over a [`TaskStore`].

use crate::error::TaskError;
use crate::store::TaskStore;
use crate::types::{validate_title, Task, TaskId};
use std::sync::Arc;
use tasklist_core::environment::{Clock, IdGenerator, SystemClock, UuidGenerator};
use tasklist_runtime::HealthCheck;

/// Injected non-deterministic inputs of the service
#[derive(Clone)]
pub struct TaskEnvironment {
    /// Clock for `createdAt` timestamps
    pub clock: Arc<dyn Clock>,
    /// Source of new task ids
    pub ids: Arc<dyn IdGenerator>,
}

impl TaskEnvironment {
    /// Creates an environment from explicit dependencies
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// Wall clock and random UUID v4 ids
    #[must_use]
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidGenerator))
    }
}

impl std::fmt::Debug for TaskEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskEnvironment").finish_non_exhaustive()
    }
}

/// CRUD operations over the task list
///
/// Cheap to clone: clones share the same store.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    env: TaskEnvironment,
}

impl TaskService {
    /// Creates a service over `store`
    #[must_use]
    pub fn new(store: Arc<dyn TaskStore>, env: TaskEnvironment) -> Self {
        Self { store, env }
    }

    /// All tasks, newest first.
    ///
    /// # Errors
    ///
    /// [`TaskError::Storage`] if the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Task>, TaskError> {
        let tasks = self.store.scan().await?;
        tracing::debug!(count = tasks.len(), "Listed tasks");
        Ok(tasks)
    }

    /// Creates a task from a raw title.
    ///
    /// # Errors
    ///
    /// [`TaskError::Validation`] for a blank or over-long title (the store is
    /// untouched), [`TaskError::Storage`] if the store fails.
    #[tracing::instrument(skip(self, title), fields(title_len = title.len()))]
    pub async fn create(&self, title: &str) -> Result<Task, TaskError> {
        let title = validate_title(title).inspect_err(|error| {
            metrics::counter!("tasks.validation_failures.total").increment(1);
            tracing::debug!(%error, "Rejected title");
        })?;

        let task = Task::new(
            TaskId::from_uuid(self.env.ids.next_id()),
            title,
            self.env.clock.now(),
        );

        self.store.insert(task.clone()).await?;

        metrics::counter!("tasks.created.total").increment(1);
        tracing::info!(task_id = %task.id, "Task created");
        Ok(task)
    }

    /// Flips completion of the task with `id`.
    ///
    /// # Errors
    ///
    /// [`TaskError::NotFound`] for an unknown id, [`TaskError::Storage`] if
    /// the store fails.
    #[tracing::instrument(skip(self, id), fields(task_id = %id))]
    pub async fn toggle(&self, id: &TaskId) -> Result<Task, TaskError> {
        let task = self
            .store
            .update(id.clone(), Box::new(Task::toggle))
            .await?
            .ok_or_else(|| TaskError::NotFound(id.clone()))?;

        metrics::counter!("tasks.toggled.total").increment(1);
        tracing::info!(completed = task.completed, "Task toggled");
        Ok(task)
    }

    /// Deletes the task with `id`.
    ///
    /// # Errors
    ///
    /// [`TaskError::NotFound`] for an unknown id, [`TaskError::Storage`] if
    /// the store fails.
    #[tracing::instrument(skip(self, id), fields(task_id = %id))]
    pub async fn remove(&self, id: &TaskId) -> Result<(), TaskError> {
        if !self.store.delete(id.clone()).await? {
            return Err(TaskError::NotFound(id.clone()));
        }

        metrics::counter!("tasks.removed.total").increment(1);
        tracing::info!("Task removed");
        Ok(())
    }

    /// Deletes every completed task and returns how many went.
    ///
    /// # Errors
    ///
    /// [`TaskError::Storage`] if the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn clear_completed(&self) -> Result<usize, TaskError> {
        let removed = self.store.delete_where(Box::new(|task| task.completed)).await?;

        metrics::counter!("tasks.cleared.total").increment(removed as u64);
        tracing::info!(removed, "Cleared completed tasks");
        Ok(removed)
    }

    /// Readiness probe: healthy when the store answers a scan
    pub async fn health(&self) -> HealthCheck {
        match self.store.scan().await {
            Ok(tasks) => HealthCheck::healthy("task_store")
                .with_metadata("tasks", tasks.len().to_string()),
            Err(error) => {
                tracing::warn!(%error, "Task store health check failed");
                HealthCheck::unhealthy("task_store", error.to_string())
            },
        }
    }
}

impl std::fmt::Debug for TaskService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskService").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::InMemoryTaskStore;
    use tasklist_testing::{test_clock, SequentialIds};

    fn service() -> (TaskService, InMemoryTaskStore) {
        let store = InMemoryTaskStore::new();
        let env = TaskEnvironment::new(Arc::new(test_clock()), Arc::new(SequentialIds::new()));
        (TaskService::new(Arc::new(store.clone()), env), store)
    }

    #[tokio::test]
    async fn create_uses_injected_clock_and_ids() {
        let (service, _) = service();
        let task = service.create("  Buy milk  ").await.unwrap();

        assert_eq!(task.id, TaskId::from_uuid(SequentialIds::nth(1)));
        assert_eq!(task.title, "Buy milk");
        assert!(!task.completed);
        assert_eq!(task.created_at, test_clock().now());
    }

    #[tokio::test]
    async fn create_rejects_blank_without_touching_store() {
        let (service, store) = service();
        let result = service.create(" \t ").await;

        assert_eq!(result, Err(TaskError::Validation("title required".into())));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn toggle_unknown_is_not_found() {
        let (service, store) = service();
        service.create("a").await.unwrap();
        let before = store.scan().await.unwrap();

        let id = TaskId::from("missing");
        assert_eq!(service.toggle(&id).await, Err(TaskError::NotFound(id)));
        assert_eq!(store.scan().await.unwrap(), before);
    }

    #[tokio::test]
    async fn remove_unknown_is_not_found() {
        let (service, _) = service();
        let id = TaskId::from("missing");
        assert_eq!(service.remove(&id).await, Err(TaskError::NotFound(id)));
    }

    #[tokio::test]
    async fn health_reports_task_count() {
        let (service, _) = service();
        service.create("a").await.unwrap();

        let check = service.health().await;
        assert!(check.status.is_healthy());
        assert_eq!(check.metadata, vec![("tasks".to_string(), "1".to_string())]);
    }
}
