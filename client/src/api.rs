//! Client-side task API adapters.
//!
//! [`TaskApi`] is what the controller talks to. Three implementations ship:
//!
//! - [`HttpTaskApi`]: the real service over HTTP (reqwest)
//! - [`InProcessTaskApi`]: a [`TaskService`] called directly, with optional
//!   simulated latency
//! - [`FailingTaskApi`]: wraps another adapter and fails chosen operations

use crate::config::ClientConfig;
use crate::error::ApiError;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tasklist_tasks::{validate_title, Task, TaskId, TaskService};

/// Boxed future returned by every [`TaskApi`] operation
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Remote task operations as seen by the client.
///
/// # Dyn Compatibility
///
/// Methods return boxed futures so the controller environment can hold an
/// `Arc<dyn TaskApi>`.
pub trait TaskApi: Send + Sync {
    /// Every task, newest first.
    ///
    /// # Errors
    ///
    /// Transport, server or decode failures.
    fn list(&self) -> ApiFuture<'_, Vec<Task>>;

    /// Create a task; the title is validated before any request is made.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank or over-long title, plus transport, server or
    /// decode failures.
    fn create(&self, title: String) -> ApiFuture<'_, Task>;

    /// Flip completion of a task.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, plus transport, server or decode failures.
    fn toggle(&self, id: TaskId) -> ApiFuture<'_, Task>;

    /// Delete a task.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, plus transport or server failures.
    fn remove(&self, id: TaskId) -> ApiFuture<'_, ()>;

    /// Delete every completed task, returning how many went.
    ///
    /// # Errors
    ///
    /// Transport, server or decode failures.
    fn clear_completed(&self) -> ApiFuture<'_, usize>;
}

/// List tasks, degrading any failure to an empty list.
///
/// The failure is logged at `warn`; callers never see it.
pub async fn load_tasks(api: &dyn TaskApi) -> Vec<Task> {
    match api.list().await {
        Ok(tasks) => tasks,
        Err(error) => {
            tracing::warn!(%error, "Failed to load tasks, showing an empty list");
            Vec::new()
        },
    }
}

// ============================================================================
// HTTP
// ============================================================================

#[derive(Serialize)]
struct CreateBody<'a> {
    title: &'a str,
}

#[derive(Deserialize)]
struct ClearedBody {
    removed: usize,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// [`TaskApi`] over HTTP
#[derive(Clone, Debug)]
pub struct HttpTaskApi {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpTaskApi {
    /// Create an adapter for the service at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    /// Send `key` as `x-api-key` on every request
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Create an adapter from client configuration.
    ///
    /// # Errors
    ///
    /// `Network` if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.authorize(self.client.request(method, format!("{}{path}", self.base_url)))
    }

    /// `{base}/todos/{id}` followed by `extra` segments, each percent-encoded
    fn task_url(&self, id: &TaskId, extra: &[&str]) -> Result<Url, ApiError> {
        let invalid = || ApiError::Network(format!("invalid service URL: {}", self.base_url));

        let mut url = Url::parse(&format!("{}/todos", self.base_url)).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .push(id.as_str())
            .extend(extra);
        Ok(url)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("x-api-key", key),
            None => builder,
        }
    }

    /// Send and turn non-success statuses into errors. `subject` names what a
    /// 404 was about.
    async fn send(builder: RequestBuilder, subject: &str) -> Result<Response, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body).map_or(body, |b| b.message);
        tracing::debug!(status = status.as_u16(), %message, "Task service returned an error");

        Err(match status {
            StatusCode::BAD_REQUEST => ApiError::Validation(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(subject.to_string()),
            status => ApiError::Server {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl TaskApi for HttpTaskApi {
    fn list(&self) -> ApiFuture<'_, Vec<Task>> {
        Box::pin(async move {
            let response = Self::send(self.request(Method::GET, "/todos"), "/todos").await?;
            Self::decode(response).await
        })
    }

    fn create(&self, title: String) -> ApiFuture<'_, Task> {
        Box::pin(async move {
            let title = validate_title(&title)?;
            let builder = self
                .request(Method::POST, "/todos")
                .json(&CreateBody { title: &title });
            let response = Self::send(builder, "/todos").await?;
            Self::decode(response).await
        })
    }

    fn toggle(&self, id: TaskId) -> ApiFuture<'_, Task> {
        Box::pin(async move {
            let url = self.task_url(&id, &["toggle"])?;
            let builder = self.authorize(self.client.request(Method::PUT, url));
            let response = Self::send(builder, id.as_str()).await?;
            Self::decode(response).await
        })
    }

    fn remove(&self, id: TaskId) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let url = self.task_url(&id, &[])?;
            let builder = self.authorize(self.client.request(Method::DELETE, url));
            Self::send(builder, id.as_str()).await?;
            Ok(())
        })
    }

    fn clear_completed(&self) -> ApiFuture<'_, usize> {
        Box::pin(async move {
            let response = Self::send(self.request(Method::DELETE, "/todos"), "/todos").await?;
            let body: ClearedBody = Self::decode(response).await?;
            Ok(body.removed)
        })
    }
}

// ============================================================================
// In-process
// ============================================================================

/// [`TaskApi`] that calls a [`TaskService`] directly
#[derive(Clone, Debug)]
pub struct InProcessTaskApi {
    service: TaskService,
    latency: Option<Duration>,
}

impl InProcessTaskApi {
    /// Adapter answering immediately
    #[must_use]
    pub const fn new(service: TaskService) -> Self {
        Self {
            service,
            latency: None,
        }
    }

    /// Sleep `latency` before every call
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl TaskApi for InProcessTaskApi {
    fn list(&self) -> ApiFuture<'_, Vec<Task>> {
        Box::pin(async move {
            self.pause().await;
            Ok(self.service.list().await?)
        })
    }

    fn create(&self, title: String) -> ApiFuture<'_, Task> {
        Box::pin(async move {
            self.pause().await;
            Ok(self.service.create(&title).await?)
        })
    }

    fn toggle(&self, id: TaskId) -> ApiFuture<'_, Task> {
        Box::pin(async move {
            self.pause().await;
            Ok(self.service.toggle(&id).await?)
        })
    }

    fn remove(&self, id: TaskId) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            self.pause().await;
            Ok(self.service.remove(&id).await?)
        })
    }

    fn clear_completed(&self) -> ApiFuture<'_, usize> {
        Box::pin(async move {
            self.pause().await;
            Ok(self.service.clear_completed().await?)
        })
    }
}

// ============================================================================
// Fault injection
// ============================================================================

/// A [`TaskApi`] operation, for selecting what [`FailingTaskApi`] breaks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `list`
    List,
    /// `create`
    Create,
    /// `toggle`
    Toggle,
    /// `remove`
    Remove,
    /// `clear_completed`
    ClearCompleted,
}

/// Wraps a [`TaskApi`] and fails the selected operations without calling it
#[derive(Clone)]
pub struct FailingTaskApi {
    inner: Arc<dyn TaskApi>,
    failing: HashSet<Operation>,
    error: ApiError,
    latency: Option<Duration>,
}

impl FailingTaskApi {
    /// Wrap `inner`; nothing fails until [`failing`](Self::failing) is called
    #[must_use]
    pub fn new(inner: Arc<dyn TaskApi>) -> Self {
        Self {
            inner,
            failing: HashSet::new(),
            error: ApiError::Network("connection refused".to_string()),
            latency: None,
        }
    }

    /// Make `operation` fail
    #[must_use]
    pub fn failing(mut self, operation: Operation) -> Self {
        self.failing.insert(operation);
        self
    }

    /// Error returned by failing operations (default: a network error)
    #[must_use]
    pub fn with_error(mut self, error: ApiError) -> Self {
        self.error = error;
        self
    }

    /// Failing operations answer after `latency` instead of at once
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn fail<T: Send + 'static>(&self, error: ApiError) -> ApiFuture<'static, T> {
        let latency = self.latency;
        Box::pin(async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            Err(error)
        })
    }

    fn check(&self, operation: Operation) -> Result<(), ApiError> {
        if self.failing.contains(&operation) {
            tracing::debug!(?operation, "Injecting API failure");
            return Err(self.error.clone());
        }
        Ok(())
    }
}

impl std::fmt::Debug for FailingTaskApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailingTaskApi")
            .field("failing", &self.failing)
            .field("error", &self.error)
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

impl TaskApi for FailingTaskApi {
    fn list(&self) -> ApiFuture<'_, Vec<Task>> {
        match self.check(Operation::List) {
            Ok(()) => self.inner.list(),
            Err(error) => self.fail(error),
        }
    }

    fn create(&self, title: String) -> ApiFuture<'_, Task> {
        match self.check(Operation::Create) {
            Ok(()) => self.inner.create(title),
            Err(error) => self.fail(error),
        }
    }

    fn toggle(&self, id: TaskId) -> ApiFuture<'_, Task> {
        match self.check(Operation::Toggle) {
            Ok(()) => self.inner.toggle(id),
            Err(error) => self.fail(error),
        }
    }

    fn remove(&self, id: TaskId) -> ApiFuture<'_, ()> {
        match self.check(Operation::Remove) {
            Ok(()) => self.inner.remove(id),
            Err(error) => self.fail(error),
        }
    }

    fn clear_completed(&self) -> ApiFuture<'_, usize> {
        match self.check(Operation::ClearCompleted) {
            Ok(()) => self.inner.clear_completed(),
            Err(error) => self.fail(error),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tasklist_tasks::{InMemoryTaskStore, TaskEnvironment};

    fn in_process() -> Arc<dyn TaskApi> {
        let service = TaskService::new(Arc::new(InMemoryTaskStore::new()), TaskEnvironment::system());
        Arc::new(InProcessTaskApi::new(service))
    }

    #[tokio::test]
    async fn in_process_round_trip() {
        let api = in_process();
        let task = api.create("  Buy milk ".into()).await.unwrap();
        assert_eq!(task.title, "Buy milk");

        let toggled = api.toggle(task.id.clone()).await.unwrap();
        assert!(toggled.completed);
        assert_eq!(api.clear_completed().await.unwrap(), 1);
        assert!(api.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn in_process_maps_service_errors() {
        let api = in_process();
        assert_eq!(
            api.create("   ".into()).await,
            Err(ApiError::Validation("title required".into()))
        );
        assert_eq!(
            api.remove(TaskId::from("ghost")).await,
            Err(ApiError::NotFound("ghost".into()))
        );
    }

    #[tokio::test]
    async fn failing_api_only_breaks_selected_operations() {
        let api = FailingTaskApi::new(in_process()).failing(Operation::Toggle);

        let task = api.create("a".into()).await.unwrap();
        assert!(matches!(api.toggle(task.id).await, Err(ApiError::Network(_))));
        assert_eq!(api.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failing_api_can_answer_late() {
        let api = FailingTaskApi::new(in_process())
            .failing(Operation::Remove)
            .with_latency(Duration::from_millis(40));

        let started = tokio::time::Instant::now();
        assert!(api.remove(TaskId::from("a")).await.is_err());
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn task_urls_encode_the_id_segment() {
        let api = HttpTaskApi::new("http://localhost:3000/api/");

        let url = api.task_url(&TaskId::from("a b/c?d"), &["toggle"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/todos/a%20b%2Fc%3Fd/toggle");

        let url = api.task_url(&TaskId::from("plain"), &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/todos/plain");
    }

    #[tokio::test]
    async fn load_tasks_degrades_to_empty() {
        let api = FailingTaskApi::new(in_process())
            .failing(Operation::List)
            .with_error(ApiError::Server {
                status: 500,
                message: "boom".into(),
            });
        api.create("kept on server".into()).await.unwrap();

        assert!(load_tasks(&api).await.is_empty());
    }

    #[tokio::test]
    async fn http_create_validates_before_sending() {
        // Nothing listens on port 9; a request would surface as Network
        let api = HttpTaskApi::new("http://127.0.0.1:9");
        assert_eq!(
            api.create(" ".into()).await,
            Err(ApiError::Validation("title required".into()))
        );
    }
}
