//! Thin request wrapper around the job-management API.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ApiError;
use crate::tasks::{NewTask, Task, TaskStatus};
use crate::watcher::WatcherStatus;

/// Error body shape the server uses for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Boundary trait for the job-management API.
///
/// Stores depend on this rather than on a concrete HTTP client, so tests
/// can substitute a recording implementation.
#[async_trait]
pub trait JobApi: Send + Sync {
    /// `GET /api/tasks[?status=...]` — full task collection, optionally
    /// filtered server-side.
    async fn list_tasks(&self, status: Option<TaskStatus>) -> Result<Vec<Task>, ApiError>;

    /// `POST /api/tasks` — submit a new task, returns the server's
    /// representation of it.
    async fn create_task(&self, new_task: &NewTask) -> Result<Task, ApiError>;

    /// `GET /api/tasks/{id}` — a single task.
    async fn get_task(&self, id: &str) -> Result<Task, ApiError>;

    /// `POST /api/tasks/{id}/pause` — side effect only.
    async fn pause_task(&self, id: &str) -> Result<(), ApiError>;

    /// `POST /api/tasks/{id}/resume` — side effect only.
    async fn resume_task(&self, id: &str) -> Result<(), ApiError>;

    /// `POST /api/tasks/{id}/cancel` — side effect only.
    async fn cancel_task(&self, id: &str) -> Result<(), ApiError>;

    /// `GET /api/watcher/status` — current watcher status record.
    async fn watcher_status(&self) -> Result<WatcherStatus, ApiError>;

    /// `POST /api/watcher/start` — side effect only.
    async fn start_watcher(&self) -> Result<(), ApiError>;

    /// `POST /api/watcher/stop` — side effect only.
    async fn stop_watcher(&self) -> Result<(), ApiError>;

    /// `GET /api/config` — full server configuration, unparsed.
    async fn fetch_config(&self) -> Result<serde_json::Value, ApiError>;
}

/// `JobApi` over HTTP via reqwest.
pub struct HttpJobApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpJobApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Map a non-2xx response into `ApiError::Status`, pulling the
    /// server's `detail` field out of the body when it parses.
    async fn status_error(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail);
        ApiError::Status { status, detail }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// POST with no meaningful response body — used for side effect only.
    async fn post_command(&self, path: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        Ok(())
    }
}

#[async_trait]
impl JobApi for HttpJobApi {
    async fn list_tasks(&self, status: Option<TaskStatus>) -> Result<Vec<Task>, ApiError> {
        let path = match status {
            Some(status) => format!("tasks?status={}", status.as_str()),
            None => "tasks".to_string(),
        };
        self.get_json(&path).await
    }

    async fn create_task(&self, new_task: &NewTask) -> Result<Task, ApiError> {
        let response = self
            .client
            .post(self.url("tasks"))
            .json(new_task)
            .send()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        response
            .json::<Task>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get_task(&self, id: &str) -> Result<Task, ApiError> {
        self.get_json(&format!("tasks/{id}")).await
    }

    async fn pause_task(&self, id: &str) -> Result<(), ApiError> {
        self.post_command(&format!("tasks/{id}/pause")).await
    }

    async fn resume_task(&self, id: &str) -> Result<(), ApiError> {
        self.post_command(&format!("tasks/{id}/resume")).await
    }

    async fn cancel_task(&self, id: &str) -> Result<(), ApiError> {
        self.post_command(&format!("tasks/{id}/cancel")).await
    }

    async fn watcher_status(&self) -> Result<WatcherStatus, ApiError> {
        self.get_json("watcher/status").await
    }

    async fn start_watcher(&self) -> Result<(), ApiError> {
        self.post_command("watcher/start").await
    }

    async fn stop_watcher(&self) -> Result<(), ApiError> {
        self.post_command("watcher/stop").await
    }

    async fn fetch_config(&self) -> Result<serde_json::Value, ApiError> {
        self.get_json("config").await
    }
}
